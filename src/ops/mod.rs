//! High-level operations for diary comments.
//!
//! This module provides the user-facing operations that tie together safety
//! screening, prompt assembly, the language-model provider and storage.

pub mod comment;
pub mod diary;

// Re-export commonly used items
pub use comment::{CommentOrchestrator, CommentView, GenerationLimits, SAFETY_RESPONSE};
pub use diary::{create_diary, get_diary_detail, retry_diary_comment, DiaryDetail};
