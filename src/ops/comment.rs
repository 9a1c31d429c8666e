//! Comment generation with safety gating.
//!
//! # Flow
//!
//! 1. Screen the diary text with the safety classifier
//! 2. Unsafe: record a safety event and use the fixed safety response; the
//!    provider is never called and the text never reaches a prompt
//! 3. Safe: assemble the prompt and call the provider once
//! 4. Upsert the single comment row for the diary
//!
//! Provider errors propagate to the caller untouched. Nothing is written when
//! generation fails, so a previous comment stays as it was.

use crate::ai::prompts::{assemble, PromptTemplate};
use crate::ai::LanguageModelProvider;
use crate::config::Config;
use crate::constants::{
    KEYWORD_MATCH_CONFIDENCE, SAFETY_EVENT_TYPE_KEYWORD, SAFETY_OVERRIDE_MODEL_NAME,
};
use crate::db::comments::Comment;
use crate::db::diaries::Diary;
use crate::db::{CommentStore, SafetyEventStore};
use crate::errors::{AppError, AppResult};
use crate::safety::SafetyClassifier;
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

/// Fixed reply used instead of model output when a crisis signal is found.
pub const SAFETY_RESPONSE: &str = "힘든 시간을 보내고 계시는군요. \
혼자 감당하지 않아도 괜찮아요. \
전문적인 도움을 받을 수 있는 곳에 연락해 보시는 건 어떨까요? \
(자살예방상담전화 1393, 정신건강위기상담전화 1577-0199)";

/// Public view of a stored comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentView {
    pub id: i64,
    pub content: String,
    pub created_at: NaiveDateTime,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}

/// Limits applied when building a prompt and calling the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationLimits {
    pub max_input_chars: usize,
    pub max_output_tokens: u32,
}

impl From<&Config> for GenerationLimits {
    fn from(config: &Config) -> Self {
        Self {
            max_input_chars: config.max_input_chars,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

/// Text and model identifier chosen for one diary before it is persisted.
struct Draft {
    content: String,
    model_name: String,
}

/// Generates, regenerates and reads the comment attached to a diary.
///
/// Holds no per-request state; all state lives in the store.
pub struct CommentOrchestrator {
    classifier: SafetyClassifier,
    template: PromptTemplate,
    provider: Box<dyn LanguageModelProvider>,
    limits: GenerationLimits,
}

impl CommentOrchestrator {
    /// Creates an orchestrator from its parts.
    pub fn new(
        classifier: SafetyClassifier,
        template: PromptTemplate,
        provider: Box<dyn LanguageModelProvider>,
        limits: GenerationLimits,
    ) -> Self {
        Self {
            classifier,
            template,
            provider,
            limits,
        }
    }

    /// Prompt version recorded alongside generated comments.
    pub fn prompt_version(&self) -> &str {
        self.template.version()
    }

    /// Generates the comment for `diary` and stores it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The provider fails (`AppError::AI`); nothing is written in that case
    /// - The store fails
    pub fn generate_comment<S>(
        &self,
        store: &S,
        diary: &Diary,
        user_name: Option<&str>,
    ) -> AppResult<CommentView>
    where
        S: CommentStore + SafetyEventStore,
    {
        let span = info_span!("generate_comment", diary_id = diary.id);
        let _guard = span.enter();

        self.produce_and_store(store, diary, user_name)
    }

    /// Looks up the comment for a diary.
    ///
    /// Absence is a normal state, e.g. when generation failed at creation time.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store fails.
    pub fn get_comment<S>(&self, store: &S, diary_id: i64) -> AppResult<Option<CommentView>>
    where
        S: CommentStore,
    {
        Ok(store.find_by_diary_id(diary_id)?.map(CommentView::from))
    }

    /// Regenerates the comment for a diary, replacing any existing one in place.
    ///
    /// The safety check runs again. A diary never ends up with two comments.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `diary_id` does not match `diary.id`
    /// - The provider fails (`AppError::AI`); the existing comment is kept
    /// - The store fails
    pub fn retry_comment<S>(
        &self,
        store: &S,
        diary_id: i64,
        diary: &Diary,
        user_name: Option<&str>,
    ) -> AppResult<CommentView>
    where
        S: CommentStore + SafetyEventStore,
    {
        let span = info_span!("retry_comment", diary_id);
        let _guard = span.enter();

        if diary.id != diary_id {
            return Err(AppError::InvalidInput(format!(
                "Diary id {} does not match requested id {}",
                diary.id, diary_id
            )));
        }

        self.produce_and_store(store, diary, user_name)
    }

    fn produce_and_store<S>(
        &self,
        store: &S,
        diary: &Diary,
        user_name: Option<&str>,
    ) -> AppResult<CommentView>
    where
        S: CommentStore + SafetyEventStore,
    {
        let draft = self.draft(store, diary, user_name)?;

        let comment = store.upsert(
            diary.id,
            &draft.content,
            &draft.model_name,
            self.template.version(),
        )?;

        info!(
            "Stored comment {} for diary {} (model {})",
            comment.id, diary.id, comment.model_name
        );
        Ok(comment.into())
    }

    fn draft<S>(&self, store: &S, diary: &Diary, user_name: Option<&str>) -> AppResult<Draft>
    where
        S: SafetyEventStore,
    {
        let verdict = self.classifier.check(&diary.content);

        if let Some(signal) = verdict.matched_signal.filter(|_| !verdict.safe) {
            warn!("Crisis signal detected in diary {}; using safety response", diary.id);
            store.append(
                diary.id,
                SAFETY_EVENT_TYPE_KEYWORD,
                KEYWORD_MATCH_CONFIDENCE,
                &format!("safety_response_override (matched keyword: {})", signal),
            )?;

            return Ok(Draft {
                content: SAFETY_RESPONSE.to_string(),
                model_name: SAFETY_OVERRIDE_MODEL_NAME.to_string(),
            });
        }

        let prompt = assemble(
            &self.template,
            user_name,
            &diary.content,
            self.limits.max_input_chars,
        );
        debug!("Assembled prompt ({} chars)", prompt.chars().count());

        let response = self
            .provider
            .generate(&prompt, self.limits.max_output_tokens)?;

        Ok(Draft {
            content: response.content,
            model_name: response.model_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{ProviderResponse, StubProvider};
    use crate::db::comments::count_comments_for_diary;
    use crate::db::diaries::{insert_diary, NewDiary};
    use crate::db::test_support::open_test_db;
    use crate::db::Database;
    use crate::errors::AIError;
    use chrono::NaiveDate;
    use std::sync::{Arc, Mutex};

    /// Provider double that records prompts and replays scripted outcomes.
    #[derive(Clone, Default)]
    struct ScriptedProvider {
        prompts: Arc<Mutex<Vec<String>>>,
        replies: Arc<Mutex<Vec<Option<&'static str>>>>,
    }

    impl ScriptedProvider {
        fn replying(replies: &[Option<&'static str>]) -> Self {
            let provider = Self::default();
            provider.replies.lock().unwrap().extend(replies.iter().rev());
            provider
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    impl LanguageModelProvider for ScriptedProvider {
        fn generate(&self, prompt: &str, _max_tokens: u32) -> AppResult<ProviderResponse> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.replies.lock().unwrap().pop().flatten() {
                Some(text) => Ok(ProviderResponse {
                    content: text.to_string(),
                    model_name: "scripted".to_string(),
                }),
                None => Err(AIError::ResponseShape("missing choices".to_string()).into()),
            }
        }
    }

    fn orchestrator_with(provider: Box<dyn LanguageModelProvider>) -> CommentOrchestrator {
        CommentOrchestrator::new(
            SafetyClassifier::default(),
            PromptTemplate::from_text("v1", "{{userName}}|{{content}}").unwrap(),
            provider,
            GenerationLimits {
                max_input_chars: 3000,
                max_output_tokens: 180,
            },
        )
    }

    fn write_diary(db: &Database, content: &str) -> Diary {
        let conn = db.get_conn().unwrap();
        insert_diary(
            &conn,
            &NewDiary {
                author: Some("Mina".to_string()),
                content: content.to_string(),
                diary_date: NaiveDate::from_ymd_opt(2024, 9, 3).unwrap(),
            },
        )
        .unwrap()
    }

    fn comment_count(db: &Database, diary_id: i64) -> i64 {
        let conn = db.get_conn().unwrap();
        count_comments_for_diary(&conn, diary_id).unwrap()
    }

    #[test]
    fn test_safe_diary_uses_stub_provider() {
        let (_dir, db) = open_test_db();
        let diary = write_diary(&db, "오늘 기분이 좋았다");
        let orchestrator = orchestrator_with(Box::new(StubProvider));

        let view = orchestrator
            .generate_comment(&db, &diary, Some("Mina"))
            .unwrap();

        let stored = db.find_by_diary_id(diary.id).unwrap().unwrap();
        assert_eq!(stored.model_name, "local-stub");
        assert_eq!(stored.prompt_version, "v1");
        assert_eq!(view, CommentView::from(stored));
        assert!(db.list_for_diary(diary.id).unwrap().is_empty());
    }

    #[test]
    fn test_crisis_diary_gets_safety_override() {
        let (_dir, db) = open_test_db();
        let diary = write_diary(&db, "요즘은 그냥 죽고 싶다는 생각뿐이야");
        let provider = ScriptedProvider::replying(&[Some("should never be used")]);
        let orchestrator = orchestrator_with(Box::new(provider.clone()));

        let view = orchestrator.generate_comment(&db, &diary, None).unwrap();

        assert_eq!(view.content, SAFETY_RESPONSE);
        assert!(provider.prompts().is_empty(), "provider must not be called");

        let stored = db.find_by_diary_id(diary.id).unwrap().unwrap();
        assert_eq!(stored.model_name, "safety-override");

        let events = db.list_for_diary(diary.id).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "crisis_keyword");
        assert_eq!(events[0].confidence_score, 1.0);
        assert!(events[0].action_taken.contains("죽고 싶"));
    }

    #[test]
    fn test_provider_failure_writes_nothing() {
        let (_dir, db) = open_test_db();
        let diary = write_diary(&db, "평범한 화요일");
        let orchestrator = orchestrator_with(Box::new(ScriptedProvider::replying(&[None])));

        let error = orchestrator
            .generate_comment(&db, &diary, None)
            .unwrap_err();

        assert!(matches!(error, AppError::AI(AIError::ResponseShape(_))));
        assert_eq!(comment_count(&db, diary.id), 0);
    }

    #[test]
    fn test_failed_retry_keeps_previous_comment() {
        let (_dir, db) = open_test_db();
        let diary = write_diary(&db, "산책을 했다");
        let orchestrator = orchestrator_with(Box::new(ScriptedProvider::replying(&[
            Some("first reply"),
            None,
        ])));

        let first = orchestrator.generate_comment(&db, &diary, None).unwrap();
        let error = orchestrator
            .retry_comment(&db, diary.id, &diary, None)
            .unwrap_err();

        assert!(error.is_ai_unavailable());
        let stored = db.find_by_diary_id(diary.id).unwrap().unwrap();
        assert_eq!(stored.content, "first reply");
        assert_eq!(stored.id, first.id);
    }

    #[test]
    fn test_retry_twice_keeps_one_row_with_latest_text() {
        let (_dir, db) = open_test_db();
        let diary = write_diary(&db, "새 책을 읽기 시작했다");
        let orchestrator = orchestrator_with(Box::new(ScriptedProvider::replying(&[
            Some("first"),
            Some("second"),
        ])));

        let first = orchestrator
            .retry_comment(&db, diary.id, &diary, None)
            .unwrap();
        let second = orchestrator
            .retry_comment(&db, diary.id, &diary, None)
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(second.content, "second");
        assert_eq!(comment_count(&db, diary.id), 1);

        let stored = db.find_by_diary_id(diary.id).unwrap().unwrap();
        assert_eq!(stored.content, "second");
        assert_eq!(stored.model_name, "scripted");
    }

    #[test]
    fn test_retry_rechecks_safety() {
        let (_dir, db) = open_test_db();
        let diary = write_diary(&db, "자살이라는 단어가 머리를 떠나지 않는다");
        let provider = ScriptedProvider::replying(&[Some("unused")]);
        let orchestrator = orchestrator_with(Box::new(provider.clone()));

        orchestrator.generate_comment(&db, &diary, None).unwrap();
        let view = orchestrator
            .retry_comment(&db, diary.id, &diary, None)
            .unwrap();

        assert_eq!(view.content, SAFETY_RESPONSE);
        assert!(provider.prompts().is_empty());
        assert_eq!(db.list_for_diary(diary.id).unwrap().len(), 2);
        assert_eq!(comment_count(&db, diary.id), 1);
    }

    #[test]
    fn test_retry_rejects_mismatched_ids() {
        let (_dir, db) = open_test_db();
        let diary = write_diary(&db, "비 오는 날");
        let orchestrator = orchestrator_with(Box::new(StubProvider));

        let error = orchestrator
            .retry_comment(&db, diary.id + 1, &diary, None)
            .unwrap_err();

        assert!(matches!(error, AppError::InvalidInput(_)));
        assert_eq!(comment_count(&db, diary.id), 0);
    }

    #[test]
    fn test_prompt_carries_name_and_truncated_content() {
        let (_dir, db) = open_test_db();
        let diary = write_diary(&db, "abcdefghij");
        let provider = ScriptedProvider::replying(&[Some("ok")]);
        let orchestrator = CommentOrchestrator::new(
            SafetyClassifier::default(),
            PromptTemplate::from_text("v1", "{{userName}}|{{content}}").unwrap(),
            Box::new(provider.clone()),
            GenerationLimits {
                max_input_chars: 4,
                max_output_tokens: 10,
            },
        );

        orchestrator
            .generate_comment(&db, &diary, Some("Mina"))
            .unwrap();

        assert_eq!(provider.prompts(), vec!["Mina|abcd".to_string()]);
    }

    #[test]
    fn test_get_comment_absent_is_not_an_error() {
        let (_dir, db) = open_test_db();
        let diary = write_diary(&db, "아무 일도 없던 날");
        let orchestrator = orchestrator_with(Box::new(StubProvider));

        assert!(orchestrator.get_comment(&db, diary.id).unwrap().is_none());

        orchestrator.generate_comment(&db, &diary, None).unwrap();
        assert!(orchestrator.get_comment(&db, diary.id).unwrap().is_some());
    }
}
