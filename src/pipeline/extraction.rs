// file: src/pipeline/extraction.rs
// description: phase 1 extraction and the simple-mode responder on the primary provider
// reference: fail-fast stage, provider errors propagate to the orchestrator

use crate::config::PrimaryProviderConfig;
use crate::credentials::ApiKey;
use crate::error::Result;
use crate::pipeline::messages::{EMPTY_ANSWER, EMPTY_EXTRACTION};
use crate::pipeline::personas::{
    ANALYST_PERSONA_PROMPT, CONTEXT_LABEL, INSTRUCTION_LABEL, SYSTEM_INSTRUCTION,
};
use crate::providers::{GenerateRequest, GenerativeModel};
use std::sync::Arc;
use tracing::debug;

pub struct ExtractionStage {
    model: Arc<dyn GenerativeModel>,
    config: PrimaryProviderConfig,
}

impl ExtractionStage {
    pub fn new(model: Arc<dyn GenerativeModel>, config: PrimaryProviderConfig) -> Self {
        Self { model, config }
    }

    /// Analyst-persona extraction at low temperature.
    pub async fn extract(
        &self,
        api_key: &ApiKey,
        context: Option<&str>,
        instruction: &str,
    ) -> Result<String> {
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: extraction_prompt(context, instruction),
            system_instruction: None,
            temperature: self.config.extraction_temperature,
        };

        let text = self.model.generate(api_key, &request).await?;
        debug!("Extraction produced {} chars", text.chars().count());
        Ok(non_empty_or(text, EMPTY_EXTRACTION))
    }

    /// One-shot answer under the general assistant instruction.
    pub async fn respond(
        &self,
        api_key: &ApiKey,
        context: Option<&str>,
        instruction: &str,
    ) -> Result<String> {
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: chat_prompt(context, instruction),
            system_instruction: Some(SYSTEM_INSTRUCTION.to_string()),
            temperature: self.config.chat_temperature,
        };

        let text = self.model.generate(api_key, &request).await?;
        Ok(non_empty_or(text, EMPTY_ANSWER))
    }
}

pub(crate) fn extraction_prompt(context: Option<&str>, instruction: &str) -> String {
    match context {
        Some(context) => format!(
            "{}\n\n{}\n{}\n\n{}\n{}",
            ANALYST_PERSONA_PROMPT, CONTEXT_LABEL, context, INSTRUCTION_LABEL, instruction
        ),
        None => format!(
            "{}\n\n{}\n{}",
            ANALYST_PERSONA_PROMPT, INSTRUCTION_LABEL, instruction
        ),
    }
}

pub(crate) fn chat_prompt(context: Option<&str>, instruction: &str) -> String {
    match context {
        Some(context) => format!("Context Data: {}\n\nUser Question: {}", context, instruction),
        None => instruction.to_string(),
    }
}

fn non_empty_or(text: String, placeholder: &str) -> String {
    if text.trim().is_empty() {
        placeholder.to_string()
    } else {
        text
    }
}
