// file: src/providers/gemini.rs
// description: Gemini generateContent integration for the primary provider
// reference: https://ai.google.dev/api/generate-content

use crate::credentials::ApiKey;
use crate::error::{PipelineError, ProviderKind, Result};
use crate::providers::{GenerateRequest, GenerativeModel};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, api_key: &ApiKey, request: &GenerateRequest) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            system_instruction: request.system_instruction.as_deref().map(|text| Content {
                role: None,
                parts: vec![Part { text }],
            }),
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        };

        debug!(
            "Requesting {} generation ({} prompt chars, temperature {})",
            request.model,
            request.prompt.chars().count(),
            request.temperature
        );

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", api_key.expose())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|source| PipelineError::Transport {
                provider: ProviderKind::Primary,
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(map_http_error(status, error_text));
        }

        let body_text = response
            .text()
            .await
            .map_err(|source| PipelineError::Transport {
                provider: ProviderKind::Primary,
                source,
            })?;

        match serde_json::from_str::<GenerateContentResponse>(&body_text) {
            Ok(parsed) => Ok(extract_text(parsed)),
            Err(e) => {
                warn!("Unparsable generateContent payload, treating as empty: {}", e);
                Ok(String::new())
            }
        }
    }
}

fn extract_text(response: GenerateContentResponse) -> String {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

fn map_http_error(status: StatusCode, body: String) -> PipelineError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .ok()
        .and_then(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    let key_problem = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || (status == StatusCode::BAD_REQUEST && message.contains("API key"));

    if key_problem {
        PipelineError::InvalidCredential {
            provider: ProviderKind::Primary,
            message,
        }
    } else {
        PipelineError::Provider {
            provider: ProviderKind::Primary,
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> GenerateRequest {
        GenerateRequest {
            model: "gemini-2.5-flash".to_string(),
            prompt: "Summarize".to_string(),
            system_instruction: Some("You are an analyst".to_string()),
            temperature: 0.2,
        }
    }

    fn key() -> ApiKey {
        ApiKey::parse("test-key").unwrap()
    }

    #[tokio::test]
    async fn test_generate_returns_joined_parts() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "systemInstruction": {"parts": [{"text": "You are an analyst"}]},
                "generationConfig": {"temperature": 0.2}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "Hello "}, {"text": "world"}]}}]
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new(server.uri());
        let text = client.generate(&key(), &request()).await.unwrap();
        assert_eq!(text, "Hello world");
    }

    #[tokio::test]
    async fn test_empty_candidates_is_empty_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = GeminiClient::new(server.uri());
        assert_eq!(client.generate(&key(), &request()).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_malformed_payload_is_empty_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = GeminiClient::new(server.uri());
        assert_eq!(client.generate(&key(), &request()).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_invalid_key_maps_to_credential_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new(server.uri());
        let err = client.generate(&key(), &request()).await.unwrap_err();
        assert!(matches!(err, PipelineError::InvalidCredential { .. }));
    }

    #[tokio::test]
    async fn test_quota_error_maps_to_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = GeminiClient::new(server.uri());
        match client.generate(&key(), &request()).await.unwrap_err() {
            PipelineError::Provider {
                status, message, ..
            } => {
                assert_eq!(status, 429);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
