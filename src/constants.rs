//! Constants used throughout the application.
//!
//! This module contains all constants used in the solace application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "solace";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A private diary that answers with a kind word";

// Logging
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "solace";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";

// Configuration Keys & Environment Variables
/// Environment variable for the SQLite database path.
pub const ENV_VAR_DB_PATH: &str = "SOLACE_DB_PATH";
/// Environment variable selecting the language-model provider.
pub const ENV_VAR_AI_PROVIDER: &str = "SOLACE_AI_PROVIDER";
/// Environment variable selecting the prompt template version.
pub const ENV_VAR_PROMPT_VERSION: &str = "SOLACE_PROMPT_VERSION";
/// Environment variable pointing at a directory of prompt templates.
pub const ENV_VAR_PROMPT_DIR: &str = "SOLACE_PROMPT_DIR";
/// Environment variable for the maximum number of output tokens.
pub const ENV_VAR_MAX_OUTPUT_TOKENS: &str = "SOLACE_MAX_OUTPUT_TOKENS";
/// Environment variable for the maximum number of diary characters sent to the model.
pub const ENV_VAR_MAX_INPUT_CHARS: &str = "SOLACE_MAX_INPUT_CHARS";
/// Environment variable for the chat-completions base URL.
pub const ENV_VAR_AI_API_URL: &str = "SOLACE_AI_API_URL";
/// Environment variable for the chat-completions bearer credential.
pub const ENV_VAR_AI_API_KEY: &str = "SOLACE_AI_API_KEY";
/// Environment variable for the remote model name.
pub const ENV_VAR_AI_MODEL: &str = "SOLACE_AI_MODEL";
/// Environment variable for the remote request timeout in seconds.
pub const ENV_VAR_AI_TIMEOUT_SECS: &str = "SOLACE_AI_TIMEOUT_SECS";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default database location relative to the home directory.
pub const DEFAULT_DB_SUBPATH: &str = ".local/share/solace/solace.db";
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// AI Defaults
/// Prompt template version used when none is configured.
pub const DEFAULT_PROMPT_VERSION: &str = "v1";
/// Maximum output tokens requested from the model.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 180;
/// Maximum diary characters embedded in a prompt.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 3000;
/// Default chat-completions base URL.
pub const DEFAULT_AI_API_URL: &str = "https://api.openai.com/v1";
/// Default remote model.
pub const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";
/// Upper bound for a single provider round-trip.
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 10;
/// Sampling temperature sent with every remote request.
pub const REMOTE_TEMPERATURE: f64 = 0.7;
/// Path appended to the base URL for chat completions.
pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

// Model identifiers
/// Model identifier reported by the stub provider.
pub const STUB_MODEL_NAME: &str = "local-stub";
/// Model identifier recorded when the safety override replaces model output.
pub const SAFETY_OVERRIDE_MODEL_NAME: &str = "safety-override";

// Prompt assembly
/// Placeholder replaced by the user's display name.
pub const PLACEHOLDER_USER_NAME: &str = "{{userName}}";
/// Placeholder replaced by the (truncated) diary content.
pub const PLACEHOLDER_CONTENT: &str = "{{content}}";
/// Display name used when the author has none.
pub const DEFAULT_USER_NAME: &str = "친구";
/// File name prefix of versioned prompt templates.
pub const PROMPT_FILE_PREFIX: &str = "ai_comment_";
/// File extension of prompt templates.
pub const PROMPT_FILE_EXTENSION: &str = ".txt";

// Safety
/// Event type recorded for deterministic keyword matches.
pub const SAFETY_EVENT_TYPE_KEYWORD: &str = "crisis_keyword";
/// Confidence recorded for a deterministic keyword match.
pub const KEYWORD_MATCH_CONFIDENCE: f64 = 1.0;

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Timestamp format produced by SQLite's CURRENT_TIMESTAMP.
pub const SQLITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Database
/// Maximum number of pooled SQLite connections.
pub const DB_POOL_MAX_SIZE: u32 = 5;
/// How long a connection waits on a locked database, in milliseconds.
pub const DB_BUSY_TIMEOUT_MS: u64 = 5000;
