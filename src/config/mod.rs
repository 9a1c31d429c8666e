//! Configuration management for the solace application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults.
//!
//! # Environment Variables
//!
//! - `SOLACE_DB_PATH`: SQLite database file (defaults to ~/.local/share/solace/solace.db)
//! - `SOLACE_AI_PROVIDER`: `stub` (default) or `remote`
//! - `SOLACE_PROMPT_VERSION`: prompt template version (defaults to `v1`)
//! - `SOLACE_PROMPT_DIR`: directory holding `ai_comment_<version>.txt` overrides
//! - `SOLACE_MAX_OUTPUT_TOKENS`: output token budget per comment (defaults to 180)
//! - `SOLACE_MAX_INPUT_CHARS`: diary characters sent to the model (defaults to 3000)
//! - `SOLACE_AI_API_URL`, `SOLACE_AI_API_KEY`, `SOLACE_AI_MODEL`: remote endpoint settings
//! - `SOLACE_AI_TIMEOUT_SECS`: bound on a single remote call (defaults to 10)

use crate::ai::ProviderKind;
use crate::constants::{
    DEFAULT_AI_API_URL, DEFAULT_AI_MODEL, DEFAULT_AI_TIMEOUT_SECS, DEFAULT_DB_SUBPATH,
    DEFAULT_MAX_INPUT_CHARS, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_PROMPT_VERSION,
    ENV_VAR_AI_API_KEY, ENV_VAR_AI_API_URL, ENV_VAR_AI_MODEL, ENV_VAR_AI_PROVIDER,
    ENV_VAR_AI_TIMEOUT_SECS, ENV_VAR_DB_PATH, ENV_VAR_HOME, ENV_VAR_MAX_INPUT_CHARS,
    ENV_VAR_MAX_OUTPUT_TOKENS, ENV_VAR_PROMPT_DIR, ENV_VAR_PROMPT_VERSION, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Configuration for the solace application.
///
/// # Examples
///
/// Overriding a few fields on top of the defaults:
/// ```
/// use solace::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     db_path: PathBuf::from("/tmp/solace.db"),
///     max_input_chars: 500,
///     ..Config::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct Config {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Which language-model provider generates comments.
    pub provider: ProviderKind,
    /// Version key of the prompt template.
    pub prompt_version: String,
    /// Optional directory to load prompt templates from instead of the built-ins.
    pub prompt_dir: Option<PathBuf>,
    /// Output token budget requested from the provider.
    pub max_output_tokens: u32,
    /// Number of diary characters embedded in a prompt.
    pub max_input_chars: usize,
    /// Base URL of the chat-completions API.
    pub api_url: String,
    /// Bearer credential for the chat-completions API.
    pub api_key: String,
    /// Remote model name.
    pub model: String,
    /// Bound on one remote round-trip.
    pub timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db_path", &"[REDACTED_PATH]")
            .field("provider", &self.provider)
            .field("prompt_version", &self.prompt_version)
            .field("prompt_dir", &self.prompt_dir.as_ref().map(|_| "[REDACTED_PATH]"))
            .field("max_output_tokens", &self.max_output_tokens)
            .field("max_input_chars", &self.max_input_chars)
            .field("api_url", &self.api_url)
            .field("api_key", &REDACTED_PLACEHOLDER)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for Config {
    /// Creates a new Config with default values and an empty database path.
    fn default() -> Self {
        Config {
            db_path: PathBuf::from(""),
            provider: ProviderKind::default(),
            prompt_version: DEFAULT_PROMPT_VERSION.to_string(),
            prompt_dir: None,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            api_url: DEFAULT_AI_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_AI_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// Paths are expanded with `shellexpand`, so `~` and `$VAR` references work.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - A path cannot be expanded
    /// - A numeric variable does not parse
    /// - The provider name is unknown
    pub fn load() -> AppResult<Self> {
        let db_path_str = env::var(ENV_VAR_DB_PATH).unwrap_or_else(|_| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_else(|_| "".to_string());
            format!("{}/{}", home, DEFAULT_DB_SUBPATH)
        });
        let db_path = expand_path(&db_path_str)?;

        let prompt_dir = match non_empty_var(ENV_VAR_PROMPT_DIR) {
            Some(dir) => Some(expand_path(&dir)?),
            None => None,
        };

        let provider = match non_empty_var(ENV_VAR_AI_PROVIDER) {
            Some(name) => name.parse()?,
            None => ProviderKind::default(),
        };

        let config = Config {
            db_path,
            provider,
            prompt_version: non_empty_var(ENV_VAR_PROMPT_VERSION)
                .unwrap_or_else(|| DEFAULT_PROMPT_VERSION.to_string()),
            prompt_dir,
            max_output_tokens: parse_var(ENV_VAR_MAX_OUTPUT_TOKENS, DEFAULT_MAX_OUTPUT_TOKENS)?,
            max_input_chars: parse_var(ENV_VAR_MAX_INPUT_CHARS, DEFAULT_MAX_INPUT_CHARS)?,
            api_url: non_empty_var(ENV_VAR_AI_API_URL)
                .unwrap_or_else(|| DEFAULT_AI_API_URL.to_string()),
            api_key: env::var(ENV_VAR_AI_API_KEY).unwrap_or_default(),
            model: non_empty_var(ENV_VAR_AI_MODEL).unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
            timeout: Duration::from_secs(parse_var(
                ENV_VAR_AI_TIMEOUT_SECS,
                DEFAULT_AI_TIMEOUT_SECS,
            )?),
        };

        Ok(config)
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when:
    /// - The database path is empty
    /// - The prompt version is empty
    /// - Token, character or timeout limits are zero
    /// - The remote provider is selected without an API key, URL or model
    pub fn validate(&self) -> AppResult<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(AppError::Config("Database path is empty".to_string()));
        }

        if self.prompt_version.trim().is_empty() {
            return Err(AppError::Config("Prompt version is empty".to_string()));
        }

        if self.max_output_tokens == 0 {
            return Err(AppError::Config(
                "Max output tokens must be greater than zero".to_string(),
            ));
        }

        if self.max_input_chars == 0 {
            return Err(AppError::Config(
                "Max input characters must be greater than zero".to_string(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(AppError::Config(
                "AI timeout must be greater than zero".to_string(),
            ));
        }

        if self.provider == ProviderKind::Remote {
            if self.api_key.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "{} is required when the remote provider is selected",
                    ENV_VAR_AI_API_KEY
                )));
            }
            if self.api_url.trim().is_empty() {
                return Err(AppError::Config("AI API URL is empty".to_string()));
            }
            if self.model.trim().is_empty() {
                return Err(AppError::Config("AI model name is empty".to_string()));
            }
        }

        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_var<T>(name: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match non_empty_var(name) {
        Some(raw) => raw.trim().parse().map_err(|e| {
            AppError::Config(format!("Invalid value for {}: '{}' ({})", name, raw, e))
        }),
        None => Ok(default),
    }
}

fn expand_path(raw: &str) -> AppResult<PathBuf> {
    let expanded = shellexpand::full(raw)
        .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
    Ok(PathBuf::from(expanded.into_owned()))
}
