//! Store traits consumed by the comment pipeline.
//!
//! The orchestrator only needs "one comment per diary" and "append a safety
//! event". These traits name exactly that surface; [`Database`] implements both
//! on top of SQLite.

use super::comments::{find_comment_by_diary_id, upsert_comment, Comment};
use super::safety_events::{append_safety_event, list_safety_events, SafetyEvent};
use super::Database;
use crate::errors::AppResult;

/// Upsert-by-diary-id storage for comments.
pub trait CommentStore {
    /// Returns the comment for `diary_id`, if one exists.
    fn find_by_diary_id(&self, diary_id: i64) -> AppResult<Option<Comment>>;

    /// Atomically inserts or replaces the comment for `diary_id`.
    ///
    /// Replacing keeps the row's id and creation time.
    fn upsert(
        &self,
        diary_id: i64,
        content: &str,
        model_name: &str,
        prompt_version: &str,
    ) -> AppResult<Comment>;
}

/// Append-only storage for safety events.
pub trait SafetyEventStore {
    /// Records one event.
    fn append(
        &self,
        diary_id: i64,
        event_type: &str,
        confidence_score: f64,
        action_taken: &str,
    ) -> AppResult<SafetyEvent>;

    /// Lists events recorded for `diary_id`, oldest first.
    fn list_for_diary(&self, diary_id: i64) -> AppResult<Vec<SafetyEvent>>;
}

impl CommentStore for Database {
    fn find_by_diary_id(&self, diary_id: i64) -> AppResult<Option<Comment>> {
        let conn = self.get_conn()?;
        find_comment_by_diary_id(&conn, diary_id)
    }

    fn upsert(
        &self,
        diary_id: i64,
        content: &str,
        model_name: &str,
        prompt_version: &str,
    ) -> AppResult<Comment> {
        let conn = self.get_conn()?;
        upsert_comment(&conn, diary_id, content, model_name, prompt_version)
    }
}

impl SafetyEventStore for Database {
    fn append(
        &self,
        diary_id: i64,
        event_type: &str,
        confidence_score: f64,
        action_taken: &str,
    ) -> AppResult<SafetyEvent> {
        let conn = self.get_conn()?;
        append_safety_event(&conn, diary_id, event_type, confidence_score, action_taken)
    }

    fn list_for_diary(&self, diary_id: i64) -> AppResult<Vec<SafetyEvent>> {
        let conn = self.get_conn()?;
        list_safety_events(&conn, diary_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::diaries::{insert_diary, NewDiary};
    use crate::db::test_support::open_test_db;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use std::thread;

    fn insert_sample_diary(db: &Database) -> i64 {
        let conn = db.get_conn().unwrap();
        insert_diary(
            &conn,
            &NewDiary {
                author: Some("Mina".to_string()),
                content: "quiet evening".to_string(),
                diary_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            },
        )
        .unwrap()
        .id
    }

    #[test]
    fn test_database_comment_store_round_trip() {
        let (_dir, db) = open_test_db();
        let diary_id = insert_sample_diary(&db);

        assert!(db.find_by_diary_id(diary_id).unwrap().is_none());

        let stored = db.upsert(diary_id, "hello", "local-stub", "v1").unwrap();
        assert_eq!(db.find_by_diary_id(diary_id).unwrap(), Some(stored));
    }

    #[test]
    fn test_database_safety_event_store() {
        let (_dir, db) = open_test_db();
        let diary_id = insert_sample_diary(&db);

        db.append(diary_id, "crisis_keyword", 1.0, "override").unwrap();
        db.append(diary_id, "crisis_keyword", 1.0, "override").unwrap();

        assert_eq!(db.list_for_diary(diary_id).unwrap().len(), 2);
    }

    #[test]
    fn test_concurrent_upserts_converge_to_one_row() {
        let (_dir, db) = open_test_db();
        let diary_id = insert_sample_diary(&db);
        let db = Arc::new(db);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let db = Arc::clone(&db);
                thread::spawn(move || {
                    db.upsert(diary_id, &format!("attempt {}", i), "local-stub", "v1")
                        .unwrap()
                })
            })
            .collect();

        let ids: Vec<i64> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap().id)
            .collect();

        assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));

        let conn = db.get_conn().unwrap();
        assert_eq!(
            crate::db::comments::count_comments_for_diary(&conn, diary_id).unwrap(),
            1
        );
    }
}
