//! Diary records.
//!
//! Diaries are owned by the surrounding application; this module only offers
//! what the comment pipeline needs: writing a diary and reading it back by id.

use super::parse_timestamp;
use crate::constants::DATE_FORMAT_ISO;
use crate::errors::{AppResult, DatabaseError};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use tracing::debug;

/// A stored diary entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diary {
    pub id: i64,
    /// Display name of the author, used to personalise the comment.
    pub author: Option<String>,
    pub content: String,
    pub diary_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// Fields supplied when writing a new diary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDiary {
    pub author: Option<String>,
    pub content: String,
    pub diary_date: NaiveDate,
}

const DIARY_COLUMNS: &str = "id, author, content, diary_date, created_at";

fn diary_from_row(row: &Row<'_>) -> Result<Diary, rusqlite::Error> {
    let raw_date: String = row.get(3)?;
    let diary_date = NaiveDate::parse_from_str(&raw_date, DATE_FORMAT_ISO).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Diary {
        id: row.get(0)?,
        author: row.get(1)?,
        content: row.get(2)?,
        diary_date,
        created_at: parse_timestamp(4, &row.get::<_, String>(4)?)?,
    })
}

/// Inserts a diary and returns the stored row.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn insert_diary(conn: &Connection, diary: &NewDiary) -> AppResult<Diary> {
    debug!("Inserting diary for date {}", diary.diary_date);

    let stored = conn
        .query_row(
            &format!(
                "INSERT INTO diaries (author, content, diary_date) VALUES (?1, ?2, ?3) RETURNING {}",
                DIARY_COLUMNS
            ),
            params![
                diary.author,
                diary.content,
                diary.diary_date.format(DATE_FORMAT_ISO).to_string()
            ],
            diary_from_row,
        )
        .map_err(DatabaseError::Sqlite)?;

    debug!("Diary inserted with id {}", stored.id);
    Ok(stored)
}

/// Retrieves a diary by id.
///
/// Returns `Ok(None)` if no diary exists with that id.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn get_diary(conn: &Connection, diary_id: i64) -> AppResult<Option<Diary>> {
    debug!("Getting diary {}", diary_id);

    conn.query_row(
        &format!("SELECT {} FROM diaries WHERE id = ?1", DIARY_COLUMNS),
        params![diary_id],
        diary_from_row,
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Retrieves a diary by id, treating absence as an error.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if no diary exists with that id.
pub fn require_diary(conn: &Connection, diary_id: i64) -> AppResult<Diary> {
    get_diary(conn, diary_id)?.ok_or_else(|| {
        DatabaseError::NotFound(format!("Diary with id {} not found", diary_id)).into()
    })
}
