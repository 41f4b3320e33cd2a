// file: src/providers/mod.rs
// description: model provider clients and the reasoning capability
// reference: internal module structure

pub mod chat_completions;
pub mod gemini;
pub mod reasoning;

use crate::credentials::ApiKey;
use crate::error::Result;
use async_trait::async_trait;

pub use chat_completions::{ChatCompletionRequest, ChatCompletionsClient, ChatMessagePayload};
pub use gemini::GeminiClient;
pub use reasoning::{
    ReasoningOutput, ReasoningProvider, RemoteReasoner, SimulatedReasoner, select_reasoner,
};

/// One generation call against the primary provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub temperature: f32,
}

/// Primary provider: prompt in, unstructured text out.
///
/// An empty string means the provider answered with no usable text.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, api_key: &ApiKey, request: &GenerateRequest) -> Result<String>;
}

/// Secondary provider speaking the chat-completions protocol.
#[async_trait]
pub trait ChatCompletionModel: Send + Sync {
    async fn complete(&self, api_key: &ApiKey, request: &ChatCompletionRequest) -> Result<String>;
}
