//! Diary boundary: writing a diary, reading it with its comment, and retrying
//! comment generation.
//!
//! Diary creation never fails because of the comment pipeline. A generation
//! error is logged and the diary is returned without a comment; the user can
//! retry later.

use super::comment::{CommentOrchestrator, CommentView};
use crate::db::diaries::{insert_diary, require_diary, Diary, NewDiary};
use crate::db::Database;
use crate::errors::{AppError, AppResult};
use serde::Serialize;
use tracing::{info, warn};

/// A diary together with its comment, if one exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiaryDetail {
    pub diary: Diary,
    pub comment: Option<CommentView>,
}

/// Stores a diary, then tries to generate its comment.
///
/// # Errors
///
/// Returns an error if:
/// - The diary content is blank
/// - The diary cannot be stored
///
/// Comment generation failures are not errors here.
pub fn create_diary(
    db: &Database,
    orchestrator: &CommentOrchestrator,
    new_diary: &NewDiary,
) -> AppResult<DiaryDetail> {
    if new_diary.content.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Diary content must not be empty".to_string(),
        ));
    }

    let diary = {
        let conn = db.get_conn()?;
        insert_diary(&conn, new_diary)?
    };
    info!("Created diary {}", diary.id);

    let comment = match orchestrator.generate_comment(db, &diary, diary.author.as_deref()) {
        Ok(view) => Some(view),
        Err(e) => {
            warn!("Comment generation failed for diary {}: {}", diary.id, e);
            None
        }
    };

    Ok(DiaryDetail { diary, comment })
}

/// Loads a diary and its comment.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if the diary does not exist.
pub fn get_diary_detail(
    db: &Database,
    orchestrator: &CommentOrchestrator,
    diary_id: i64,
) -> AppResult<DiaryDetail> {
    let diary = {
        let conn = db.get_conn()?;
        require_diary(&conn, diary_id)?
    };
    let comment = orchestrator.get_comment(db, diary_id)?;

    Ok(DiaryDetail { diary, comment })
}

/// Regenerates the comment for an existing diary.
///
/// Unlike [`create_diary`], provider failures are returned to the caller.
///
/// # Errors
///
/// Returns an error if:
/// - The diary does not exist
/// - Generation fails; the previous comment is kept
pub fn retry_diary_comment(
    db: &Database,
    orchestrator: &CommentOrchestrator,
    diary_id: i64,
) -> AppResult<CommentView> {
    let diary = {
        let conn = db.get_conn()?;
        require_diary(&conn, diary_id)?
    };

    orchestrator.retry_comment(db, diary_id, &diary, diary.author.as_deref())
}
