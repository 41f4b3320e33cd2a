// file: src/pipeline/orchestrator.rs
// description: sequences context assembly, extraction and reasoning into one artifact
// reference: single async entry point that resolves every failure to text

use crate::config::Config;
use crate::context::ContextAssembler;
use crate::credentials::CredentialStore;
use crate::error::{PipelineError, ProviderKind, Result};
use crate::knowledge::{DocumentCollection, DocumentSelection};
use crate::models::{PipelineMode, PipelineRequest, PipelineResult, ReasoningSource};
use crate::pipeline::extraction::ExtractionStage;
use crate::pipeline::messages::{deep_failure_message, user_facing_message};
use crate::pipeline::narrator::ProgressNarrator;
use crate::pipeline::progress::{PipelineStats, StatsRecorder};
use crate::pipeline::state::{PipelineState, StateTrace};
use crate::providers::{
    ChatCompletionModel, ChatCompletionsClient, GeminiClient, GenerativeModel, select_reasoner,
};
use crate::utils::telemetry::OperationTimer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Everything one invocation produced, for callers that need more than the text.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub text: String,
    pub result: Option<PipelineResult>,
    pub final_state: PipelineState,
    pub trace: Vec<PipelineState>,
    pub duration: Duration,
}

impl PipelineOutcome {
    pub fn succeeded(&self) -> bool {
        self.final_state == PipelineState::Done
    }
}

pub struct PipelineOrchestrator {
    config: Arc<Config>,
    credentials: Arc<CredentialStore>,
    primary: Arc<dyn GenerativeModel>,
    secondary: Arc<dyn ChatCompletionModel>,
    documents: Arc<RwLock<DocumentCollection>>,
    extraction: ExtractionStage,
    assembler: ContextAssembler,
    narrator: ProgressNarrator,
    stats: StatsRecorder,
}

impl PipelineOrchestrator {
    pub fn new(
        config: Arc<Config>,
        credentials: Arc<CredentialStore>,
        primary: Arc<dyn GenerativeModel>,
        secondary: Arc<dyn ChatCompletionModel>,
        documents: Arc<RwLock<DocumentCollection>>,
    ) -> Self {
        let extraction = ExtractionStage::new(Arc::clone(&primary), config.primary.clone());
        let assembler = ContextAssembler::with_budget(config.pipeline.context_budget_chars);
        let narrator = ProgressNarrator::new(Duration::from_millis(
            config.pipeline.narration_interval_ms,
        ));

        Self {
            config,
            credentials,
            primary,
            secondary,
            documents,
            extraction,
            assembler,
            narrator,
            stats: StatsRecorder::default(),
        }
    }

    /// Wires the HTTP clients for both providers from the configured base URLs.
    pub fn from_config(
        config: Arc<Config>,
        credentials: Arc<CredentialStore>,
        documents: Arc<RwLock<DocumentCollection>>,
    ) -> Self {
        let primary = Arc::new(GeminiClient::new(config.primary.base_url.clone()));
        let secondary = Arc::new(ChatCompletionsClient::new(
            config.secondary.base_url.clone(),
        ));
        Self::new(config, credentials, primary, secondary, documents)
    }

    pub fn narrator(&self) -> &ProgressNarrator {
        &self.narrator
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    pub fn documents(&self) -> &Arc<RwLock<DocumentCollection>> {
        &self.documents
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats.snapshot()
    }

    /// Runs one invocation. Never fails: every error path resolves to a message.
    pub async fn run_pipeline(
        &self,
        instruction: &str,
        selection: &DocumentSelection,
        mode: PipelineMode,
    ) -> String {
        self.execute(instruction, selection, mode).await.text
    }

    pub async fn execute(
        &self,
        instruction: &str,
        selection: &DocumentSelection,
        mode: PipelineMode,
    ) -> PipelineOutcome {
        let timer = OperationTimer::new(&format!("{} analysis", mode));
        let mut trace = StateTrace::new();

        let outcome = self.run(&mut trace, instruction, selection, mode).await;
        let duration = timer.finish();

        match outcome {
            Ok(result) => {
                trace.advance(PipelineState::Done);
                let degraded = matches!(
                    result,
                    PipelineResult::Deep {
                        reasoning_source: ReasoningSource::Degraded,
                        ..
                    }
                );
                self.stats.record_success(duration, degraded);

                PipelineOutcome {
                    text: result.render(),
                    result: Some(result),
                    final_state: trace.current(),
                    trace: trace.into_states(),
                    duration,
                }
            }
            Err(e) => {
                error!("{} analysis failed: {}", mode, e);
                trace.advance(PipelineState::Failed);
                self.stats.record_failure(duration);

                PipelineOutcome {
                    text: failure_text(&e, mode),
                    result: None,
                    final_state: trace.current(),
                    trace: trace.into_states(),
                    duration,
                }
            }
        }
    }

    async fn run(
        &self,
        trace: &mut StateTrace,
        instruction: &str,
        selection: &DocumentSelection,
        mode: PipelineMode,
    ) -> Result<PipelineResult> {
        let credentials = self.credentials.snapshot();
        let primary_key = credentials
            .primary_key()
            .cloned()
            .ok_or(PipelineError::MissingCredential(ProviderKind::Primary))?;

        trace.advance(PipelineState::AssemblingContext);
        let context = {
            let documents = self.documents.read().await;
            self.assembler.assemble(&documents, selection)
        };
        let request = PipelineRequest::new(instruction, context, mode);

        trace.advance(PipelineState::Extracting);
        match request.mode {
            PipelineMode::Simple => {
                let text = self
                    .extraction
                    .respond(&primary_key, request.context.as_deref(), &request.instruction)
                    .await?;
                Ok(PipelineResult::Simple(text))
            }
            PipelineMode::Deep => {
                let _narration = self.narrator.start();

                let extraction = self
                    .extraction
                    .extract(&primary_key, request.context.as_deref(), &request.instruction)
                    .await?;

                trace.advance(PipelineState::Reasoning);
                let reasoner = select_reasoner(
                    &self.config,
                    &credentials,
                    &primary_key,
                    Arc::clone(&self.primary),
                    Arc::clone(&self.secondary),
                );
                let critique = reasoner.critique(&extraction).await;
                info!(
                    "Reasoning finished via {} ({:?})",
                    reasoner.name(),
                    critique.source
                );

                Ok(PipelineResult::Deep {
                    extraction,
                    reasoning: critique.text,
                    reasoning_source: critique.source,
                })
            }
        }
    }
}

fn failure_text(err: &PipelineError, mode: PipelineMode) -> String {
    match (err, mode) {
        (PipelineError::MissingCredential(_), _) | (_, PipelineMode::Simple) => {
            user_facing_message(err)
        }
        (_, PipelineMode::Deep) => deep_failure_message(err),
    }
}
