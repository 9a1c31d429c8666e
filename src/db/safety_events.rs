//! Safety event audit trail.
//!
//! Events are only ever appended. Nothing in this crate updates or deletes them.

use super::parse_timestamp;
use crate::errors::{AppResult, DatabaseError};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use tracing::debug;

/// A recorded safety detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetyEvent {
    pub id: i64,
    pub diary_id: i64,
    /// Kind of detection, e.g. `crisis_keyword`.
    pub event_type: String,
    /// Detection confidence between 0.0 and 1.0.
    pub confidence_score: f64,
    /// What was done about it, including the matched signal.
    pub action_taken: String,
    pub created_at: NaiveDateTime,
}

const EVENT_COLUMNS: &str = "id, diary_id, event_type, confidence_score, action_taken, created_at";

fn event_from_row(row: &Row<'_>) -> Result<SafetyEvent, rusqlite::Error> {
    Ok(SafetyEvent {
        id: row.get(0)?,
        diary_id: row.get(1)?,
        event_type: row.get(2)?,
        confidence_score: row.get(3)?,
        action_taken: row.get(4)?,
        created_at: parse_timestamp(5, &row.get::<_, String>(5)?)?,
    })
}

/// Appends a safety event and returns the stored row.
///
/// # Errors
///
/// Returns an error if the database operation fails or the confidence score
/// lies outside 0.0..=1.0.
pub fn append_safety_event(
    conn: &Connection,
    diary_id: i64,
    event_type: &str,
    confidence_score: f64,
    action_taken: &str,
) -> AppResult<SafetyEvent> {
    debug!("Recording {} safety event for diary {}", event_type, diary_id);

    conn.query_row(
        &format!(
            "INSERT INTO safety_events (diary_id, event_type, confidence_score, action_taken) \
             VALUES (?1, ?2, ?3, ?4) RETURNING {}",
            EVENT_COLUMNS
        ),
        params![diary_id, event_type, confidence_score, action_taken],
        event_from_row,
    )
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Lists all safety events for a diary, oldest first.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn list_safety_events(conn: &Connection, diary_id: i64) -> AppResult<Vec<SafetyEvent>> {
    debug!("Listing safety events for diary {}", diary_id);

    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM safety_events WHERE diary_id = ?1 ORDER BY id ASC",
            EVENT_COLUMNS
        ))
        .map_err(DatabaseError::Sqlite)?;

    let events = stmt
        .query_map(params![diary_id], event_from_row)
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    Ok(events)
}
