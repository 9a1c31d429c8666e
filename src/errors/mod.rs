//! Error handling utilities for the solace application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// User-facing text shared by every AI failure.
pub const AI_UNAVAILABLE_MESSAGE: &str = "AI service is temporarily unavailable. Please try again later.";

/// Represents specific error cases that can occur while loading the prompt template.
///
/// Template errors only happen at startup. The application must not begin
/// generating comments without a valid template, so callers treat these as fatal.
///
/// # Examples
///
/// ```
/// use solace::errors::TemplateError;
///
/// let error = TemplateError::UnknownVersion("v9".to_string());
/// assert!(format!("{}", error).contains("v9"));
/// ```
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No built-in template exists for the configured prompt version.
    #[error("No built-in prompt template for version '{0}'. Set SOLACE_PROMPT_DIR or use a known version.")]
    UnknownVersion(String),

    /// The template file could not be read from the prompt directory.
    #[error("Failed to read prompt template {path}: {source}")]
    Read {
        /// Path of the template file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The template lacks the placeholder for diary content.
    #[error("Prompt template '{0}' does not contain the {{{{content}}}} placeholder")]
    MissingContentPlaceholder(String),
}

/// Represents specific error cases that can occur during database operations.
///
/// # Examples
///
/// ```
/// use solace::errors::DatabaseError;
///
/// let error = DatabaseError::NotFound("Diary with id 123 not found".to_string());
/// assert!(format!("{}", error).contains("not found"));
/// ```
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLite database error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("Failed to get connection from pool: {0}\n\nThis may indicate database connection issues. Try closing other solace instances.")]
    Pool(#[from] r2d2::Error),

    /// Requested record not found in database.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A stored value could not be converted into its domain type.
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Represents specific error cases that can occur while talking to a language model.
///
/// All variants are reported to users as the same "temporarily unavailable"
/// condition. The variants exist for logs and for tests.
///
/// # Examples
///
/// ```
/// use solace::errors::AIError;
///
/// let error = AIError::ResponseShape("missing choices".to_string());
/// assert!(format!("{}", error).contains("missing choices"));
/// ```
#[derive(Debug, Error)]
pub enum AIError {
    /// The provider could not be reached, or the request timed out.
    #[error("AI provider request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("AI provider returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Leading part of the response body
        body: String,
    },

    /// The provider answered, but the body did not have the expected shape.
    #[error("Invalid response from AI provider: {0}")]
    ResponseShape(String),
}

/// Represents all possible errors that can occur in the solace application.
///
/// Note: This type does not implement `Clone` to avoid losing error context when
/// cloning `std::io::Error` values.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use solace::errors::AppError;
///
/// let error = AppError::Config("Missing database path".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing database path");
/// ```
///
/// Converting from an IO error:
/// ```
/// use solace::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Caller supplied arguments that cannot be acted on.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Errors while loading the prompt template.
    #[error("Prompt template error: {0}")]
    Template(#[from] TemplateError),

    /// Errors related to database operations.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Errors related to AI provider calls.
    #[error("AI error: {0}")]
    AI(#[from] AIError),
}

impl AppError {
    /// Returns true when the error came from the AI provider layer.
    pub fn is_ai_unavailable(&self) -> bool {
        matches!(self, AppError::AI(_))
    }

    /// Returns true when the error is a missing-record condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Database(DatabaseError::NotFound(_)))
    }

    /// Message suitable for showing to an end user.
    ///
    /// Provider errors collapse into a single "temporarily unavailable" text so
    /// that transport details never leak to users.
    ///
    /// ```
    /// use solace::errors::{AIError, AppError, AI_UNAVAILABLE_MESSAGE};
    ///
    /// let error: AppError = AIError::ResponseShape("empty body".to_string()).into();
    /// assert_eq!(error.user_message(), AI_UNAVAILABLE_MESSAGE);
    /// ```
    pub fn user_message(&self) -> String {
        match self {
            AppError::AI(_) => AI_UNAVAILABLE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use solace::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::InvalidInput("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;
