//! Deterministic crisis-keyword screening for diary text.
//!
//! The classifier is a pure function: it never touches storage and never fails.
//! Recording a safety event for an unsafe verdict is the caller's job.

use serde::Serialize;

/// Crisis phrases screened by default, in priority order.
///
/// The first entry contained in a diary wins, so more specific phrases should
/// come before broader ones when the list is edited.
pub const DEFAULT_CRISIS_KEYWORDS: &[&str] = &[
    "자살",
    "자해",
    "죽고 싶",
    "죽어 버리고 싶",
    "죽어버릴",
    "살고 싶지 않",
    "목숨을 끊",
    "삶을 끝내",
    "생을 마감",
    "극단적 선택",
    "사라지고 싶",
    "suicide",
    "kill myself",
    "end my life",
    "want to die",
    "self harm",
];

/// Outcome of screening one diary's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// False when a crisis keyword was found.
    pub safe: bool,
    /// The keyword that triggered an unsafe verdict, exactly as configured.
    pub matched_signal: Option<String>,
}

impl Verdict {
    fn safe() -> Self {
        Self {
            safe: true,
            matched_signal: None,
        }
    }

    fn unsafe_with(keyword: &str) -> Self {
        Self {
            safe: false,
            matched_signal: Some(keyword.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
struct Keyword {
    literal: String,
    normalized: String,
}

/// Keyword-based crisis classifier.
///
/// Matching ignores whitespace on both sides, so "죽고 싶" and "죽고싶" are
/// the same signal. Latin letters are compared case-insensitively.
///
/// # Examples
///
/// ```
/// use solace::safety::SafetyClassifier;
///
/// let classifier = SafetyClassifier::default();
/// let verdict = classifier.check("요즘 너무 죽고싶다는 생각이 들어");
/// assert!(!verdict.safe);
/// assert_eq!(verdict.matched_signal.as_deref(), Some("죽고 싶"));
/// ```
#[derive(Debug, Clone)]
pub struct SafetyClassifier {
    keywords: Vec<Keyword>,
}

impl Default for SafetyClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_CRISIS_KEYWORDS.iter().copied())
    }
}

impl SafetyClassifier {
    /// Builds a classifier from an ordered keyword list.
    ///
    /// Keywords that are empty after normalization are dropped, since they
    /// would otherwise match every text.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .filter_map(|keyword| {
                let literal = keyword.as_ref().to_string();
                let normalized = normalize(&literal);
                (!normalized.is_empty()).then_some(Keyword {
                    literal,
                    normalized,
                })
            })
            .collect();

        Self { keywords }
    }

    /// Number of active keywords.
    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    /// Screens `text` for crisis keywords.
    ///
    /// Blank text is always safe.
    pub fn check(&self, text: &str) -> Verdict {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return Verdict::safe();
        }

        self.keywords
            .iter()
            .find(|keyword| normalized.contains(&keyword.normalized))
            .map_or_else(Verdict::safe, |keyword| Verdict::unsafe_with(&keyword.literal))
    }
}

fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
