//! Offline provider returning a fixed comment.

use super::provider::{LanguageModelProvider, ProviderResponse};
use crate::constants::STUB_MODEL_NAME;
use crate::errors::AppResult;
use tracing::debug;

/// Comment returned for every prompt.
pub const STUB_COMMENT: &str = "오늘 하루도 정말 수고 많으셨어요. \
일기를 통해 마음을 나눠 주셔서 감사해요. \
내일도 좋은 하루가 되시길 바랄게요.";

/// Deterministic provider for local and offline use. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubProvider;

impl LanguageModelProvider for StubProvider {
    fn generate(&self, _prompt: &str, max_tokens: u32) -> AppResult<ProviderResponse> {
        debug!("Stub provider called (max_tokens={})", max_tokens);

        Ok(ProviderResponse {
            content: STUB_COMMENT.to_string(),
            model_name: STUB_MODEL_NAME.to_string(),
        })
    }
}
