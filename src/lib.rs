// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod context;
pub mod credentials;
pub mod error;
pub mod exporter;
pub mod knowledge;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod transcript;
pub mod utils;

pub use config::{
    Config, KnowledgeConfig, PipelineConfig, PrimaryProviderConfig, SecondaryProviderConfig,
    TranscriptConfig,
};
pub use context::ContextAssembler;
pub use credentials::{ApiKey, CredentialSnapshot, CredentialSource, CredentialStore};
pub use error::{PipelineError, ProviderKind, Result};
pub use exporter::{ExportManifest, JsonExporter};
pub use knowledge::{DocumentCollection, DocumentLoader, DocumentSelection};
pub use models::{
    ChatMessage, DocumentCategory, KnowledgeDocument, PipelineMode, PipelineResult, Role,
};
pub use pipeline::{
    NarrationDisplay, NarrationStage, PipelineOrchestrator, PipelineOutcome, PipelineState,
    PipelineStats, ProgressNarrator,
};
pub use providers::{
    ChatCompletionModel, ChatCompletionsClient, GeminiClient, GenerativeModel, ReasoningProvider,
};
pub use transcript::{AnalysisSession, Transcript, TranscriptStore};
pub use utils::{HealthCheck, HealthReport, HealthStatus, OperationTimer, Validator};
