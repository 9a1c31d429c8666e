//! Language-model provider abstraction.
//!
//! A provider turns one prompt into one piece of generated text. Exactly two
//! variants exist: a deterministic offline stub and a remote chat-completions
//! client. Neither retries on its own; retrying is always an explicit caller
//! action.

use super::remote::{RemoteProvider, RemoteProviderConfig};
use super::stub::StubProvider;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Text produced by a provider together with the model that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    /// Generated text
    pub content: String,
    /// Identifier of the model that generated it
    pub model_name: String,
}

/// A backend that generates a comment for a prompt.
pub trait LanguageModelProvider: Send + Sync {
    /// Generates text for `prompt`, asking for at most `max_tokens` output tokens.
    ///
    /// # Errors
    ///
    /// Returns `AppError::AI` on any transport, authentication, timeout or
    /// malformed-response condition.
    fn generate(&self, prompt: &str, max_tokens: u32) -> AppResult<ProviderResponse>;
}

/// Which provider implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Deterministic canned response, no network.
    #[default]
    Stub,
    /// OpenAI-compatible chat-completions endpoint.
    Remote,
}

impl ProviderKind {
    /// Configuration string for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Stub => "stub",
            ProviderKind::Remote => "remote",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stub" => Ok(ProviderKind::Stub),
            "remote" | "openai" => Ok(ProviderKind::Remote),
            other => Err(AppError::Config(format!(
                "Unknown AI provider '{}'. Expected 'stub' or 'remote'",
                other
            ))),
        }
    }
}

/// Builds the provider selected by `config`.
///
/// # Errors
///
/// Returns an error if the remote HTTP client cannot be constructed.
pub fn build_provider(config: &Config) -> AppResult<Box<dyn LanguageModelProvider>> {
    info!("Using {} AI provider", config.provider);

    match config.provider {
        ProviderKind::Stub => Ok(Box::new(StubProvider)),
        ProviderKind::Remote => {
            let remote = RemoteProvider::new(RemoteProviderConfig::from(config))?;
            Ok(Box::new(remote))
        }
    }
}
