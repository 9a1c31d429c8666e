//! HTTP client for OpenAI-compatible chat-completions endpoints.
//!
//! One prompt is sent as a single user message. The response must contain
//! `choices[0].message.content`; anything else is reported as an error rather
//! than guessed at.

use super::prompts::truncate_chars;
use super::provider::{LanguageModelProvider, ProviderResponse};
use crate::config::Config;
use crate::constants::{CHAT_COMPLETIONS_PATH, REDACTED_PLACEHOLDER, REMOTE_TEMPERATURE};
use crate::errors::{AIError, AppError, AppResult};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Longest slice of an error body kept in `AIError::Status`.
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

/// A message in a chat-completions request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender
    pub role: String,
    /// The content of the message
    pub content: String,
}

impl Message {
    /// Creates a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for chat completion.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f64,
}

/// Response from chat completion. Every level is optional so that missing
/// fields surface as shape errors with a precise message.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Settings for [`RemoteProvider`].
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteProviderConfig {
    /// Base URL, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    /// Bearer credential
    pub api_key: String,
    /// Model name sent with each request and reported back to callers
    pub model: String,
    /// Bound on one request/response round-trip
    pub timeout: Duration,
}

impl fmt::Debug for RemoteProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &REDACTED_PLACEHOLDER)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl From<&Config> for RemoteProviderConfig {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            timeout: config.timeout,
        }
    }
}

/// Provider backed by a remote chat-completions API.
pub struct RemoteProvider {
    config: RemoteProviderConfig,
    client: Client,
}

impl fmt::Debug for RemoteProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RemoteProvider {
    /// Creates a new remote provider with a bounded request timeout.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the HTTP client cannot be built.
    pub fn new(config: RemoteProviderConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to configure AI HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            CHAT_COMPLETIONS_PATH
        )
    }
}

impl LanguageModelProvider for RemoteProvider {
    fn generate(&self, prompt: &str, max_tokens: u32) -> AppResult<ProviderResponse> {
        debug!(
            "Sending chat request with model: {} (max_tokens={})",
            self.config.model, max_tokens
        );

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![Message::user(prompt)],
            max_tokens,
            temperature: REMOTE_TEMPERATURE,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .map_err(|e| {
                warn!("AI provider request failed: {}", e);
                AIError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            warn!("AI provider returned HTTP {}", status.as_u16());
            return Err(AIError::Status {
                status: status.as_u16(),
                body: truncate_chars(&error_text, ERROR_BODY_PREVIEW_CHARS).to_string(),
            }
            .into());
        }

        let body = response.text().map_err(AIError::Transport)?;
        let content = extract_content(&body)?;

        debug!("Received chat response ({} chars)", content.chars().count());
        Ok(ProviderResponse {
            content,
            model_name: self.config.model.clone(),
        })
    }
}

/// Pulls `choices[0].message.content` out of a response body, trimmed.
fn extract_content(body: &str) -> Result<String, AIError> {
    if body.trim().is_empty() {
        return Err(AIError::ResponseShape("empty response body".to_string()));
    }

    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| {
        AIError::ResponseShape(format!("failed to parse chat response: {}", e))
    })?;

    let choices = parsed
        .choices
        .ok_or_else(|| AIError::ResponseShape("response has no 'choices' field".to_string()))?;
    let first = choices
        .into_iter()
        .next()
        .ok_or_else(|| AIError::ResponseShape("response 'choices' is empty".to_string()))?;
    let message = first
        .message
        .ok_or_else(|| AIError::ResponseShape("first choice has no 'message'".to_string()))?;
    let content = message
        .content
        .ok_or_else(|| AIError::ResponseShape("message has no 'content'".to_string()))?;

    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AIError::ResponseShape("message content is blank".to_string()));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn provider_for(server: &mockito::Server) -> RemoteProvider {
        RemoteProvider::new(RemoteProviderConfig {
            base_url: server.url(),
            api_key: "sk-test".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn assert_shape_error(result: AppResult<ProviderResponse>) {
        match result {
            Err(AppError::AI(AIError::ResponseShape(_))) => {}
            other => panic!("Expected ResponseShape error, got {:?}", other),
        }
    }

    #[test]
    fn test_message_constructor() {
        let user = Message::user("Hello");
        assert_eq!(user.role, "user");
        assert_eq!(user.content, "Hello");
    }

    #[test]
    fn test_extract_content_trims() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "  고마워요 \n"}}]});
        assert_eq!(extract_content(&body.to_string()).unwrap(), "고마워요");
    }

    #[test]
    fn test_extract_content_rejects_each_missing_level() {
        let bodies = [
            String::new(),
            "   ".to_string(),
            "not json".to_string(),
            "null".to_string(),
            json!({}).to_string(),
            json!({"choices": []}).to_string(),
            json!({"choices": [{}]}).to_string(),
            json!({"choices": [{"message": {}}]}).to_string(),
            json!({"choices": [{"message": {"content": null}}]}).to_string(),
            json!({"choices": [{"message": {"content": 42}}]}).to_string(),
            json!({"choices": [{"message": {"content": "   "}}]}).to_string(),
        ];

        for body in bodies {
            assert!(
                matches!(extract_content(&body), Err(AIError::ResponseShape(_))),
                "expected shape error for body {:?}",
                body
            );
        }
    }

    #[test]
    fn test_generate_sends_wire_contract() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::Json(json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "prompt text"}],
                "max_tokens": 180,
                "temperature": 0.7
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"choices": [{"message": {"role": "assistant", "content": " 잘 하셨어요 "}}]})
                    .to_string(),
            )
            .create();

        let response = provider_for(&server).generate("prompt text", 180).unwrap();

        mock.assert();
        assert_eq!(response.content, "잘 하셨어요");
        assert_eq!(response.model_name, "gpt-4o-mini");
    }

    #[test]
    fn test_generate_missing_choices_is_shape_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"id": "cmpl-1", "object": "chat.completion"}).to_string())
            .create();

        assert_shape_error(provider_for(&server).generate("prompt", 10));
    }

    #[test]
    fn test_generate_http_error_is_status_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"invalid api key"}}"#)
            .create();

        match provider_for(&server).generate("prompt", 10) {
            Err(AppError::AI(AIError::Status { status, body })) => {
                assert_eq!(status, 401);
                assert!(body.contains("invalid api key"));
            }
            other => panic!("Expected Status error, got {:?}", other),
        }
    }

    #[test]
    fn test_generate_unreachable_host_is_transport_error() {
        let provider = RemoteProvider::new(RemoteProviderConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: "sk-test".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(2),
        })
        .unwrap();

        match provider.generate("prompt", 10) {
            Err(AppError::AI(AIError::Transport(_))) => {}
            other => panic!("Expected Transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_is_ignored() {
        let provider = RemoteProvider::new(RemoteProviderConfig {
            base_url: "https://api.example.com/v1/".to_string(),
            api_key: "k".to_string(),
            model: "m".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        assert_eq!(provider.endpoint(), "https://api.example.com/v1/chat/completions");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = RemoteProviderConfig {
            base_url: "https://api.example.com/v1".to_string(),
            api_key: "sk-very-secret".to_string(),
            model: "m".to_string(),
            timeout: Duration::from_secs(1),
        };

        let output = format!("{:?}", config);
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("sk-very-secret"));
    }
}
