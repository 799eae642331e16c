use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One recognizer call result: the winning intent label plus the raw entity
/// payload. Entities are kept as loose JSON on purpose — the upstream shape
/// is not regular (some kinds only expose a raw span under `"$instance"`),
/// so the normalizer navigates it defensively instead of deserializing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecognizerResult {
    pub top_intent: String,
    pub score: f64,
    pub entities: Value,
}

impl RecognizerResult {
    pub fn new(top_intent: impl Into<String>, score: f64, entities: Value) -> Self {
        Self { top_intent: top_intent.into(), score, entities }
    }
}

/// One candidate temporal value recognized from a prompt reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeResolution {
    pub timex: String,
}

impl DateTimeResolution {
    pub fn new(timex: impl Into<String>) -> Self {
        Self { timex: timex.into() }
    }
}

#[derive(Debug, Error)]
pub enum RecognizerError {
    #[error("recognizer transport failure: {0}")]
    Transport(String),
    #[error("recognizer returned an unexpected payload: {0}")]
    UnexpectedPayload(String),
}

/// External NLU collaborator. Must be safe for concurrent invocation from
/// independent sessions.
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(&self, utterance: &str) -> Result<RecognizerResult, RecognizerError>;

    /// Turn a raw reply to a date prompt into candidate temporal values.
    /// The default accepts TIMEX-shaped literals verbatim; richer
    /// recognizers may override this with real date/time extraction.
    async fn resolve_datetime(
        &self,
        utterance: &str,
    ) -> Result<Vec<DateTimeResolution>, RecognizerError> {
        Ok(literal_timex(utterance).map(DateTimeResolution::new).into_iter().collect())
    }
}

/// Accepts strings already in TIMEX form: digits plus the handful of TIMEX
/// structural characters (`-`, `T`, `:`, `X`, `W`, `P`, parens, commas).
pub(crate) fn literal_timex(utterance: &str) -> Option<String> {
    let trimmed = utterance.trim();
    if trimmed.is_empty() {
        return None;
    }
    let shaped = trimmed
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | 'T' | ':' | 'X' | 'W' | 'P' | 'D' | '(' | ')' | ','));
    let anchored = trimmed.chars().any(|ch| ch.is_ascii_digit() || ch == 'X');
    (shaped && anchored).then(|| trimmed.to_string())
}
