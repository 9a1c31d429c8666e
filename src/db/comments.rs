//! AI comment storage.
//!
//! Each diary has at most one comment. Writes go through a single
//! `INSERT ... ON CONFLICT(diary_id) DO UPDATE ... RETURNING` statement, so an
//! insert and a replace are the same atomic operation and concurrent writers
//! for one diary converge on one row.

use super::parse_timestamp;
use crate::errors::{AppResult, DatabaseError};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use tracing::debug;

/// A stored AI comment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub id: i64,
    pub diary_id: i64,
    pub content: String,
    /// Model that produced the text, or the safety-override sentinel.
    pub model_name: String,
    /// Prompt template version in effect when the text was produced.
    pub prompt_version: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

const COMMENT_COLUMNS: &str =
    "id, diary_id, content, model_name, prompt_version, created_at, updated_at";

fn comment_from_row(row: &Row<'_>) -> Result<Comment, rusqlite::Error> {
    Ok(Comment {
        id: row.get(0)?,
        diary_id: row.get(1)?,
        content: row.get(2)?,
        model_name: row.get(3)?,
        prompt_version: row.get(4)?,
        created_at: parse_timestamp(5, &row.get::<_, String>(5)?)?,
        updated_at: parse_timestamp(6, &row.get::<_, String>(6)?)?,
    })
}

/// Inserts the comment for a diary, or replaces the existing one in place.
///
/// On replace the id and creation timestamp are preserved; content, model
/// name, prompt version and `updated_at` change.
///
/// # Errors
///
/// Returns an error if the database operation fails, including when the diary
/// does not exist.
pub fn upsert_comment(
    conn: &Connection,
    diary_id: i64,
    content: &str,
    model_name: &str,
    prompt_version: &str,
) -> AppResult<Comment> {
    debug!("Upserting comment for diary {} (model {})", diary_id, model_name);

    let comment = conn
        .query_row(
            &format!(
                r#"
                INSERT INTO ai_comments (diary_id, content, model_name, prompt_version)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(diary_id) DO UPDATE SET
                    content = excluded.content,
                    model_name = excluded.model_name,
                    prompt_version = excluded.prompt_version,
                    updated_at = CURRENT_TIMESTAMP
                RETURNING {}
                "#,
                COMMENT_COLUMNS
            ),
            params![diary_id, content, model_name, prompt_version],
            comment_from_row,
        )
        .map_err(DatabaseError::Sqlite)?;

    debug!("Comment {} stored for diary {}", comment.id, diary_id);
    Ok(comment)
}

/// Retrieves the comment for a diary.
///
/// Returns `Ok(None)` if the diary has no comment yet.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn find_comment_by_diary_id(conn: &Connection, diary_id: i64) -> AppResult<Option<Comment>> {
    debug!("Getting comment for diary {}", diary_id);

    conn.query_row(
        &format!("SELECT {} FROM ai_comments WHERE diary_id = ?1", COMMENT_COLUMNS),
        params![diary_id],
        comment_from_row,
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Counts comment rows for a diary. Always 0 or 1.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn count_comments_for_diary(conn: &Connection, diary_id: i64) -> AppResult<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM ai_comments WHERE diary_id = ?1",
        params![diary_id],
        |row| row.get(0),
    )
    .map_err(|e| DatabaseError::Sqlite(e).into())
}
