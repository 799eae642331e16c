//! Deterministic keyword recognizer for tests and offline runs.
//!
//! Emits the same payload shape the hosted prediction endpoint returns, so
//! the normalizer treats both sources identically. It is intentionally
//! conservative: anything it cannot read with confidence is simply absent
//! from the payload and the dialog prompts for it.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::intent::Intent;
use crate::recognizer::{Recognizer, RecognizerError, RecognizerResult};

const BOOKING_KEYWORDS: [&str; 5] = ["book", "flight", "travel", "fly", "trip"];
const MENTION_STOPWORDS: [&str; 9] =
    ["book", "travel", "fly", "go", "plan", "to", "from", "on", "under"];

#[derive(Clone, Debug)]
pub struct PatternRecognizer {
    airports: Vec<&'static str>,
}

impl Default for PatternRecognizer {
    fn default() -> Self {
        Self {
            airports: vec![
                "paris", "london", "new york", "berlin", "seattle", "madrid", "cairo", "tokyo",
                "sydney", "rome",
            ],
        }
    }
}

impl PatternRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn classify(&self, normalized: &str) -> Intent {
        if normalized.contains("cancel") || normalized.contains("quit") {
            Intent::Cancel
        } else if normalized.contains("weather") {
            Intent::GetWeather
        } else if BOOKING_KEYWORDS.iter().any(|keyword| normalized.contains(keyword)) {
            Intent::BookFlight
        } else {
            Intent::NoneIntent
        }
    }

    fn is_known_airport(&self, mention: &str) -> bool {
        self.airports.iter().any(|airport| *airport == mention)
    }

    fn booking_entities(&self, normalized: &str) -> Value {
        let tokens = tokenize(normalized);
        let mut entities = Map::new();
        let mut instance = Map::new();

        for (entity_name, preposition) in [("To", "to"), ("From", "from")] {
            if let Some(mention) = mention_after(&tokens, preposition) {
                let start = normalized.find(&mention).unwrap_or(0);
                instance.insert(
                    entity_name.to_string(),
                    json!([{
                        "text": mention,
                        "startIndex": start,
                        "endIndex": start + mention.len(),
                    }]),
                );
                let resolution = if self.is_known_airport(&mention) {
                    json!([{"$instance": {"airport": [{"text": mention}]}}])
                } else {
                    json!([{"$instance": {}}])
                };
                entities.insert(entity_name.to_string(), resolution);
            }
        }

        let dates: Vec<Value> = tokens
            .iter()
            .filter(|token| looks_like_date(token))
            .take(2)
            .map(|token| json!({"type": "date", "timex": [token]}))
            .collect();
        if !dates.is_empty() {
            entities.insert("datetime".to_string(), Value::Array(dates));
        }

        if let Some((number, units)) = extract_money(&tokens) {
            entities.insert("money".to_string(), json!([{"number": number, "units": units}]));
        }

        if !instance.is_empty() {
            entities.insert("$instance".to_string(), Value::Object(instance));
        }

        Value::Object(entities)
    }
}

#[async_trait]
impl Recognizer for PatternRecognizer {
    async fn recognize(&self, utterance: &str) -> Result<RecognizerResult, RecognizerError> {
        let normalized = utterance.trim().to_ascii_lowercase();
        let intent = self.classify(&normalized);
        let entities = match intent {
            Intent::BookFlight => self.booking_entities(&normalized),
            _ => json!({}),
        };
        let score = if intent == Intent::NoneIntent { 0.5 } else { 0.9 };
        Ok(RecognizerResult::new(intent.as_str(), score, entities))
    }
}

fn tokenize(normalized: &str) -> Vec<String> {
    normalized
        .split_whitespace()
        .map(|token| {
            token
                .trim_matches(|ch: char| !ch.is_ascii_alphanumeric() && !matches!(ch, '$' | '-'))
                .to_string()
        })
        .filter(|token| !token.is_empty())
        .collect()
}

/// The word (or two-word phrase) following a preposition, e.g. the "new
/// york" in "from new york". Verbs and follow-on prepositions end the span;
/// every occurrence of the preposition is tried ("to book ... to paris").
fn mention_after(tokens: &[String], preposition: &str) -> Option<String> {
    for (position, _) in tokens.iter().enumerate().filter(|(_, token)| *token == preposition) {
        let mut parts = Vec::new();
        for token in tokens.iter().skip(position + 1).take(2) {
            if MENTION_STOPWORDS.contains(&token.as_str())
                || !token.chars().all(|ch| ch.is_ascii_alphabetic())
            {
                break;
            }
            parts.push(token.clone());
        }
        if !parts.is_empty() {
            return Some(parts.join(" "));
        }
    }
    None
}

fn looks_like_date(token: &str) -> bool {
    token.len() >= 6
        && token.contains('-')
        && token.chars().all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | 'X' | 'W' | 'T' | ':'))
}

fn extract_money(tokens: &[String]) -> Option<(i64, &'static str)> {
    for (index, token) in tokens.iter().enumerate() {
        if let Some(amount) = token.strip_prefix('$') {
            if let Ok(number) = amount.parse::<i64>() {
                return Some((number, "Dollar"));
            }
        }
        if let Ok(number) = token.parse::<i64>() {
            if let Some(units) = tokens.get(index + 1).and_then(|unit| currency_unit(unit)) {
                return Some((number, units));
            }
        }
    }
    None
}

fn currency_unit(token: &str) -> Option<&'static str> {
    match token {
        "usd" | "dollar" | "dollars" | "bucks" => Some("Dollar"),
        "eur" | "euro" | "euros" => Some("Euro"),
        "gbp" | "pound" | "pounds" => Some("Pound"),
        _ => None,
    }
}
