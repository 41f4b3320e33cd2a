// file: src/providers/chat_completions.rs
// description: chat-completions API integration for the secondary reasoning provider
// reference: https://api-docs.deepseek.com/api/create-chat-completion

use crate::credentials::ApiKey;
use crate::error::{PipelineError, ProviderKind, Result};
use crate::providers::ChatCompletionModel;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessagePayload {
    pub role: String,
    pub content: String,
}

impl ChatMessagePayload {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessagePayload>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    client: Client,
    base_url: String,
}

impl ChatCompletionsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatCompletionModel for ChatCompletionsClient {
    async fn complete(&self, api_key: &ApiKey, request: &ChatCompletionRequest) -> Result<String> {
        debug!(
            "Requesting {} chat completion ({} messages, max_tokens {})",
            request.model,
            request.messages.len(),
            request.max_tokens
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", api_key.expose()))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|source| PipelineError::Transport {
                provider: ProviderKind::Secondary,
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelineError::Provider {
                provider: ProviderKind::Secondary,
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body_text = response
            .text()
            .await
            .map_err(|source| PipelineError::Transport {
                provider: ProviderKind::Secondary,
                source,
            })?;

        match serde_json::from_str::<ChatCompletionResponse>(&body_text) {
            Ok(parsed) => Ok(parsed
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .unwrap_or_default()),
            Err(e) => {
                warn!("Unparsable chat completion payload, treating as empty: {}", e);
                Ok(String::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: "deepseek-chat".to_string(),
            messages: vec![
                ChatMessagePayload::system("critic"),
                ChatMessagePayload::user("report"),
            ],
            temperature: 0.5,
            max_tokens: 4096,
        }
    }

    #[tokio::test]
    async fn test_complete_sends_bearer_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_json(serde_json::json!({
                "model": "deepseek-chat",
                "messages": [
                    {"role": "system", "content": "critic"},
                    {"role": "user", "content": "report"}
                ],
                "temperature": 0.5,
                "max_tokens": 4096
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "verdict"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ChatCompletionsClient::new(server.uri());
        let key = ApiKey::parse("sk-test").unwrap();
        assert_eq!(client.complete(&key, &request()).await.unwrap(), "verdict");
    }

    #[tokio::test]
    async fn test_non_success_carries_body_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(402).set_body_string("Insufficient Balance"))
            .mount(&server)
            .await;

        let client = ChatCompletionsClient::new(format!("{}/", server.uri()));
        let key = ApiKey::parse("sk-test").unwrap();
        match client.complete(&key, &request()).await.unwrap_err() {
            PipelineError::Provider {
                provider,
                status,
                message,
            } => {
                assert_eq!(provider, ProviderKind::Secondary);
                assert_eq!(status, 402);
                assert_eq!(message, "Insufficient Balance");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_empty_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let client = ChatCompletionsClient::new(server.uri());
        let key = ApiKey::parse("sk-test").unwrap();
        assert_eq!(client.complete(&key, &request()).await.unwrap(), "");
    }
}
