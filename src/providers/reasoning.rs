// file: src/providers/reasoning.rs
// description: phase 2 critique capability with remote and simulated variants
// reference: best-effort stage, failures degrade to in-band text

use crate::config::Config;
use crate::credentials::{ApiKey, CredentialSnapshot};
use crate::models::ReasoningSource;
use crate::pipeline::messages::{EMPTY_CRITIQUE, reasoning_fallback_message};
use crate::pipeline::personas::{DEEP_LOGIC_PROMPT, REPORT_LABEL, SIMULATION_NOTE};
use crate::providers::{
    ChatCompletionModel, ChatCompletionRequest, ChatMessagePayload, GenerateRequest,
    GenerativeModel,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ReasoningOutput {
    pub text: String,
    pub source: ReasoningSource,
}

/// Critiques a phase 1 report. Never fails: errors become in-band text.
#[async_trait]
pub trait ReasoningProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn critique(&self, report: &str) -> ReasoningOutput;
}

/// Prompt sent to the primary provider when the critic is simulated.
pub fn simulated_critique_prompt(report: &str) -> String {
    format!(
        "{}\n{}\n\n{}\n\n{}",
        DEEP_LOGIC_PROMPT, SIMULATION_NOTE, REPORT_LABEL, report
    )
}

pub struct RemoteReasoner {
    client: Arc<dyn ChatCompletionModel>,
    api_key: ApiKey,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl RemoteReasoner {
    pub fn new(
        client: Arc<dyn ChatCompletionModel>,
        api_key: ApiKey,
        model: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            api_key,
            model: model.into(),
            temperature,
            max_tokens,
        }
    }
}

#[async_trait]
impl ReasoningProvider for RemoteReasoner {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn critique(&self, report: &str) -> ReasoningOutput {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessagePayload::system(DEEP_LOGIC_PROMPT),
                ChatMessagePayload::user(report),
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        match self.client.complete(&self.api_key, &request).await {
            Ok(text) if text.trim().is_empty() => ReasoningOutput {
                text: EMPTY_CRITIQUE.to_string(),
                source: ReasoningSource::Remote,
            },
            Ok(text) => ReasoningOutput {
                text,
                source: ReasoningSource::Remote,
            },
            Err(e) => {
                warn!("Remote reasoning failed, degrading: {}", e);
                ReasoningOutput {
                    text: reasoning_fallback_message(&e),
                    source: ReasoningSource::Degraded,
                }
            }
        }
    }
}

pub struct SimulatedReasoner {
    model: Arc<dyn GenerativeModel>,
    api_key: ApiKey,
    model_id: String,
    temperature: f32,
}

impl SimulatedReasoner {
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        api_key: ApiKey,
        model_id: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            model,
            api_key,
            model_id: model_id.into(),
            temperature,
        }
    }
}

#[async_trait]
impl ReasoningProvider for SimulatedReasoner {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn critique(&self, report: &str) -> ReasoningOutput {
        let request = GenerateRequest {
            model: self.model_id.clone(),
            prompt: simulated_critique_prompt(report),
            system_instruction: None,
            temperature: self.temperature,
        };

        match self.model.generate(&self.api_key, &request).await {
            Ok(text) if text.trim().is_empty() => ReasoningOutput {
                text: EMPTY_CRITIQUE.to_string(),
                source: ReasoningSource::Simulated,
            },
            Ok(text) => ReasoningOutput {
                text,
                source: ReasoningSource::Simulated,
            },
            Err(e) => {
                warn!("Simulated reasoning failed, degrading: {}", e);
                ReasoningOutput {
                    text: reasoning_fallback_message(&e),
                    source: ReasoningSource::Degraded,
                }
            }
        }
    }
}

/// Picks the remote critic when a secondary key resolves, the simulated one otherwise.
pub fn select_reasoner(
    config: &Config,
    credentials: &CredentialSnapshot,
    primary_key: &ApiKey,
    primary: Arc<dyn GenerativeModel>,
    secondary: Arc<dyn ChatCompletionModel>,
) -> Box<dyn ReasoningProvider> {
    match credentials.secondary_key() {
        Some(key) => {
            info!("Reasoning stage: remote ({})", config.secondary.model);
            Box::new(RemoteReasoner::new(
                secondary,
                key.clone(),
                config.secondary.model.clone(),
                config.secondary.temperature,
                config.secondary.max_tokens,
            ))
        }
        None => {
            info!("Reasoning stage: simulated on {}", config.primary.model);
            Box::new(SimulatedReasoner::new(
                primary,
                primary_key.clone(),
                config.primary.model.clone(),
                config.primary.critique_temperature,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{CredentialSource, ResolvedCredential};
    use crate::error::{PipelineError, ProviderKind, Result};
    use crate::pipeline::messages::REASONING_FALLBACK_HEADER;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingGenerator {
        prompts: Mutex<Vec<GenerateRequest>>,
        reply: String,
    }

    #[async_trait]
    impl GenerativeModel for RecordingGenerator {
        async fn generate(&self, _key: &ApiKey, request: &GenerateRequest) -> Result<String> {
            self.prompts.lock().unwrap().push(request.clone());
            Ok(self.reply.clone())
        }
    }

    struct FailingChat;

    #[async_trait]
    impl ChatCompletionModel for FailingChat {
        async fn complete(&self, _key: &ApiKey, _req: &ChatCompletionRequest) -> Result<String> {
            Err(PipelineError::Provider {
                provider: ProviderKind::Secondary,
                status: 500,
                message: "upstream exploded".to_string(),
            })
        }
    }

    fn key(raw: &str) -> ApiKey {
        ApiKey::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_remote_failure_degrades_in_band() {
        let reasoner = RemoteReasoner::new(Arc::new(FailingChat), key("sk"), "deepseek-chat", 0.8, 512);
        let output = reasoner.critique("report").await;

        assert_eq!(output.source, ReasoningSource::Degraded);
        assert!(output.text.starts_with(REASONING_FALLBACK_HEADER));
        assert!(output.text.contains("HTTP 500: upstream exploded"));
    }

    #[tokio::test]
    async fn test_simulated_wraps_report_with_critic_persona() {
        let generator = Arc::new(RecordingGenerator {
            reply: "CRITIQUE_OK".to_string(),
            ..Default::default()
        });
        let reasoner = SimulatedReasoner::new(generator.clone(), key("g"), "gemini-2.5-flash", 0.5);

        let output = reasoner.critique("EXTRACT_OK").await;
        assert_eq!(output.text, "CRITIQUE_OK");
        assert_eq!(output.source, ReasoningSource::Simulated);

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].prompt, simulated_critique_prompt("EXTRACT_OK"));
        assert_eq!(prompts[0].temperature, 0.5);
    }

    #[tokio::test]
    async fn test_simulated_empty_uses_placeholder() {
        let generator = Arc::new(RecordingGenerator::default());
        let reasoner = SimulatedReasoner::new(generator, key("g"), "gemini-2.5-flash", 0.5);
        assert_eq!(reasoner.critique("r").await.text, EMPTY_CRITIQUE);
    }

    #[test]
    fn test_factory_selects_by_secondary_credential() {
        let config = Config::default_config();
        let primary: Arc<dyn GenerativeModel> = Arc::new(RecordingGenerator::default());
        let secondary: Arc<dyn ChatCompletionModel> = Arc::new(FailingChat);

        let without = CredentialSnapshot::default();
        let reasoner = select_reasoner(
            &config,
            &without,
            &key("g"),
            primary.clone(),
            secondary.clone(),
        );
        assert_eq!(reasoner.name(), "simulated");

        let with = CredentialSnapshot {
            primary: None,
            secondary: Some(ResolvedCredential {
                key: key("sk"),
                source: CredentialSource::Session,
            }),
        };
        let reasoner = select_reasoner(&config, &with, &key("g"), primary, secondary);
        assert_eq!(reasoner.name(), "remote");
    }
}
