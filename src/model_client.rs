use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model request timed out")]
    Timeout,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Model API error: {0}")]
    Api(String),
    #[error("Failed to parse model response: {0}")]
    Parse(String),
}

/// External language-model capability. The pipeline only ever sees this
/// trait; the host process decides once at startup whether a real client
/// is available and injects it (or nothing) into the analyzer.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ModelError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// API key; falls back to the OPENAI_API_KEY environment variable.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ModelConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// OpenAI-compatible chat-completions client. Each call is a single
/// bounded network operation with no retry.
pub struct OpenAiClient {
    client: Client,
    config: ModelConfig,
    api_key: String,
}

impl OpenAiClient {
    /// Build a client if a credential is configured. Returns `None` when
    /// no key is present, which permanently routes the pipeline to the
    /// local fallback path.
    pub fn from_config(config: &ModelConfig) -> Option<Self> {
        let api_key = match config.resolve_api_key() {
            Some(key) => key,
            None => {
                log::info!("no model API key configured, using pattern-based analysis only");
                return None;
            }
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("phishlens/", env!("CARGO_PKG_VERSION")))
            .build();

        match client {
            Ok(client) => Some(OpenAiClient {
                client,
                config: config.clone(),
                api_key,
            }),
            Err(e) => {
                log::warn!("failed to build HTTP client for model calls: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl CompletionModel for OpenAiClient {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ModelError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
            max_tokens,
        };

        log::debug!(
            "sending completion request to {} (model {}, max_tokens {max_tokens})",
            self.config.base_url,
            self.config.model
        );

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.config.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout
                } else {
                    ModelError::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ModelError::Api(format!("{status}: {body}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Parse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ModelError::Parse("response contained no choices".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout_seconds, 30);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_config_key_takes_precedence() {
        let config = ModelConfig {
            api_key: Some("sk-test".to_string()),
            ..ModelConfig::default()
        };
        assert_eq!(config.resolve_api_key(), Some("sk-test".to_string()));
    }

    #[test]
    fn test_blank_config_key_is_ignored() {
        let config = ModelConfig {
            api_key: Some("   ".to_string()),
            ..ModelConfig::default()
        };
        // A blank key must not count as a configured credential.
        assert!(config.resolve_api_key().is_none());
    }

    #[test]
    fn test_chat_request_wire_shape() {
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user",
                content: "안녕하세요",
            }],
            temperature: 0.3,
            max_tokens: 300,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 300);
    }

    #[test]
    fn test_chat_response_parsing() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"위험합니다"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "위험합니다");
    }
}
