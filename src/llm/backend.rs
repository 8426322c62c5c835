// file: src/llm/backend.rs
// description: chat completion backend trait and OpenAI-compatible HTTP implementation
// reference: https://platform.openai.com/docs/api-reference/chat/create

use crate::config::LlmConfig;
use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub response_format: ResponseFormat,
}

/// Executes one completion call and returns the raw message content.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
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

/// Any endpoint speaking the `/chat/completions` protocol: OpenAI, Groq,
/// OpenRouter, a litellm proxy or a local server.
#[derive(Clone)]
pub struct OpenAiCompatibleBackend {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiCompatibleBackend {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            PipelineError::Config(
                "no LLM API key configured (set llm.api_key, DOCQA__LLM__API_KEY or OPENAI_API_KEY)"
                    .to_string(),
            )
        })?;
        Ok(Self::new(api_key, config.base_url.clone()))
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionBackend for OpenAiCompatibleBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        debug!(
            "Requesting completion from {} with model {}",
            self.base_url, request.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| PipelineError::LlmTransport(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelineError::LlmProvider {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            PipelineError::InvalidResponse(format!("Failed to parse completion envelope: {}", e))
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PipelineError::InvalidResponse("No message content in completion".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_openai_shape() {
        let request = CompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage::user("hi")],
            response_format: ResponseFormat::json_object(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let backend = OpenAiCompatibleBackend::new("key".into(), "http://localhost:4000/v1/");
        assert_eq!(backend.endpoint(), "http://localhost:4000/v1/chat/completions");
    }

    #[test]
    fn test_from_config_uses_configured_key() {
        let config = LlmConfig {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key: Some("gsk-test".to_string()),
        };
        let backend = OpenAiCompatibleBackend::from_config(&config).unwrap();
        assert_eq!(backend.api_key, "gsk-test");
    }

    #[test]
    fn test_envelope_content_extraction() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"[]"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("[]"));
    }
}
