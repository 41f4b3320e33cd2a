// file: src/transcript/session.rs
// description: caller boundary pairing a transcript with the pipeline orchestrator
// reference: one user message in, exactly one assistant message out

use crate::error::Result;
use crate::knowledge::DocumentSelection;
use crate::models::{ChatMessage, PipelineMode};
use crate::pipeline::PipelineOrchestrator;
use crate::transcript::Transcript;
use crate::utils::Validator;
use std::sync::Arc;
use tracing::debug;

pub struct AnalysisSession {
    orchestrator: Arc<PipelineOrchestrator>,
    transcript: Transcript,
}

impl AnalysisSession {
    pub fn new(orchestrator: Arc<PipelineOrchestrator>) -> Self {
        Self::with_transcript(orchestrator, Transcript::new())
    }

    pub fn with_transcript(orchestrator: Arc<PipelineOrchestrator>, transcript: Transcript) -> Self {
        Self {
            orchestrator,
            transcript,
        }
    }

    /// Rejects a blank instruction before anything is appended; otherwise
    /// appends the user message and the single assistant reply.
    pub async fn send(
        &mut self,
        instruction: &str,
        selection: &DocumentSelection,
        mode: PipelineMode,
    ) -> Result<&ChatMessage> {
        let instruction = Validator::validate_instruction(instruction)?;

        self.transcript.push_user(instruction.as_str());
        debug!(
            "Running {} analysis over {} selected documents",
            mode,
            selection.len()
        );

        let reply = self
            .orchestrator
            .run_pipeline(&instruction, selection, mode)
            .await;
        Ok(self.transcript.push_assistant(reply))
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn orchestrator(&self) -> &Arc<PipelineOrchestrator> {
        &self.orchestrator
    }

    pub fn into_transcript(self) -> Transcript {
        self.transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::credentials::{ApiKey, CredentialStore};
    use crate::error::{PipelineError, ProviderKind};
    use crate::knowledge::DocumentCollection;
    use crate::models::Role;
    use crate::pipeline::messages::MISSING_PRIMARY_KEY;
    use crate::providers::{
        ChatCompletionModel, ChatCompletionRequest, GenerateRequest, GenerativeModel,
    };
    use async_trait::async_trait;
    use tokio::sync::RwLock;

    struct Echo;

    #[async_trait]
    impl GenerativeModel for Echo {
        async fn generate(&self, _key: &ApiKey, request: &GenerateRequest) -> Result<String> {
            Ok(format!("echo: {}", request.prompt))
        }
    }

    struct Unused;

    #[async_trait]
    impl ChatCompletionModel for Unused {
        async fn complete(&self, _key: &ApiKey, _req: &ChatCompletionRequest) -> Result<String> {
            Err(PipelineError::Validation("not expected".to_string()))
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn session(primary_key: Option<&str>) -> AnalysisSession {
        let config = Arc::new(Config::default_config());
        let credentials = Arc::new(CredentialStore::with_env_reader(&config, no_env));
        if let Some(key) = primary_key {
            credentials.set_override(ProviderKind::Primary, key);
        }
        let orchestrator = PipelineOrchestrator::new(
            config,
            credentials,
            Arc::new(Echo),
            Arc::new(Unused),
            Arc::new(RwLock::new(DocumentCollection::new())),
        );
        AnalysisSession::new(Arc::new(orchestrator))
    }

    #[tokio::test]
    async fn test_blank_instruction_appends_nothing() {
        let mut session = session(Some("g"));
        let err = session
            .send("   ", &DocumentSelection::new(), PipelineMode::Simple)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Validation(_)));
        assert_eq!(session.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_send_appends_user_then_one_assistant() {
        let mut session = session(Some("g"));
        let reply = session
            .send(" hello ", &DocumentSelection::new(), PipelineMode::Simple)
            .await
            .unwrap();
        assert_eq!(reply.text, "echo: hello");

        let messages = session.transcript().messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].text, "hello");
        assert_eq!(messages[2].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_failure_still_yields_one_assistant_message() {
        let mut session = session(None);
        let reply = session
            .send("memo", &DocumentSelection::new(), PipelineMode::Deep)
            .await
            .unwrap();
        assert_eq!(reply.text, MISSING_PRIMARY_KEY);
        assert_eq!(session.into_transcript().len(), 3);
    }
}
