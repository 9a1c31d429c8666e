//! Prompt templates and prompt assembly for diary comments.
//!
//! Templates are versioned text resources named `ai_comment_<version>.txt`.
//! Known versions are compiled into the binary; a prompt directory can override
//! them at runtime. Either way the template is loaded once at startup.

use crate::constants::{
    DEFAULT_USER_NAME, PLACEHOLDER_CONTENT, PLACEHOLDER_USER_NAME, PROMPT_FILE_EXTENSION,
    PROMPT_FILE_PREFIX,
};
use crate::errors::TemplateError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Templates shipped with the binary, keyed by version.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("v1", include_str!("../../prompts/ai_comment_v1.txt")),
    ("v2", include_str!("../../prompts/ai_comment_v2.txt")),
];

/// A validated prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    version: String,
    text: String,
}

impl PromptTemplate {
    /// Loads the template for `version`.
    ///
    /// When `prompt_dir` is given the file `ai_comment_<version>.txt` is read
    /// from it; otherwise the built-in template for that version is used.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No built-in template exists for the version
    /// - The template file cannot be read
    /// - The template has no `{{content}}` placeholder
    pub fn load(version: &str, prompt_dir: Option<&Path>) -> Result<Self, TemplateError> {
        let text = match prompt_dir {
            Some(dir) => {
                let path = template_path(dir, version);
                debug!("Reading prompt template from {:?}", path);
                fs::read_to_string(&path).map_err(|source| TemplateError::Read { path, source })?
            }
            None => BUILTIN_TEMPLATES
                .iter()
                .find(|(builtin, _)| *builtin == version)
                .map(|(_, text)| (*text).to_string())
                .ok_or_else(|| TemplateError::UnknownVersion(version.to_string()))?,
        };

        let template = Self::from_text(version, text)?;
        info!("Loaded prompt template version {}", version);
        Ok(template)
    }

    /// Wraps an in-memory template, validating its placeholders.
    pub fn from_text(
        version: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self, TemplateError> {
        let version = version.into();
        let text = text.into();

        if !text.contains(PLACEHOLDER_CONTENT) {
            return Err(TemplateError::MissingContentPlaceholder(version));
        }

        Ok(Self { version, text })
    }

    /// The version this template was loaded for.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Raw template text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Builds the path of a versioned template inside `dir`.
pub fn template_path(dir: &Path, version: &str) -> PathBuf {
    dir.join(format!(
        "{}{}{}",
        PROMPT_FILE_PREFIX, version, PROMPT_FILE_EXTENSION
    ))
}

/// Returns the first `max_chars` characters of `text`.
///
/// Plain prefix truncation: no attempt is made to end on a word boundary.
///
/// ```
/// use solace::ai::prompts::truncate_chars;
///
/// assert_eq!(truncate_chars("오늘은 맑음", 3), "오늘은");
/// assert_eq!(truncate_chars("short", 100), "short");
/// ```
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Assembles the final prompt for one diary.
///
/// `{{userName}}` is substituted first, falling back to a friendly default when
/// the name is missing or blank. `{{content}}` is substituted last with the
/// diary text cut to `max_input_chars` characters.
///
/// ```
/// use solace::ai::prompts::{assemble, PromptTemplate};
///
/// let template = PromptTemplate::from_text("t", "Hi {{userName}}: {{content}}").unwrap();
/// assert_eq!(assemble(&template, Some("Mina"), "long diary", 4), "Hi Mina: long");
/// ```
pub fn assemble(
    template: &PromptTemplate,
    user_name: Option<&str>,
    diary_content: &str,
    max_input_chars: usize,
) -> String {
    let user_name = user_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_USER_NAME);
    let content = truncate_chars(diary_content, max_input_chars);

    template
        .text()
        .replace(PLACEHOLDER_USER_NAME, user_name)
        .replace(PLACEHOLDER_CONTENT, content)
}
