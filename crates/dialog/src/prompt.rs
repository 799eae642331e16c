use serde::{Deserialize, Serialize};

use wayfare_nlu::DateTimeResolution;

/// The response type a suspended prompt is waiting for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptKind {
    Text,
    Confirm,
    DateTime,
}

/// A suspension point: display `text`, await a reply of `kind`. The
/// `retry_text` is shown when the reply fails validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub kind: PromptKind,
    pub text: String,
    pub retry_text: Option<String>,
}

impl Prompt {
    pub fn text(text: impl Into<String>) -> Self {
        Self { kind: PromptKind::Text, text: text.into(), retry_text: None }
    }

    pub fn confirm(text: impl Into<String>, retry_text: impl Into<String>) -> Self {
        Self { kind: PromptKind::Confirm, text: text.into(), retry_text: Some(retry_text.into()) }
    }

    pub fn date_time(text: impl Into<String>, retry_text: impl Into<String>) -> Self {
        Self { kind: PromptKind::DateTime, text: text.into(), retry_text: Some(retry_text.into()) }
    }
}

/// A typed reply matching the kind the prompt requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptAnswer {
    Text(String),
    Confirm(bool),
    DateTime(Vec<DateTimeResolution>),
}

/// Yes/no vocabulary for confirmation prompts. Anything else is "not an
/// answer" and the prompt is re-issued.
pub fn parse_confirmation(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "yeah" | "yep" | "sure" | "ok" | "okay" | "confirm" => Some(true),
        "no" | "n" | "nope" | "nah" | "negative" => Some(false),
        _ => None,
    }
}
