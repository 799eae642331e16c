//! Recognizer boundary for the booking dialog.
//!
//! The NLU engine is a black box that turns one utterance into an intent
//! label plus a bag of typed, positioned entities. This crate owns:
//! - the `Recognizer` trait and result types (`recognizer`)
//! - the normalizer that maps a raw result onto a `BookingRequest`
//!   (`normalize`)
//! - a deterministic offline recognizer for tests and local runs (`pattern`)
//! - an HTTP client for a hosted prediction endpoint (`client`)
//!
//! The recognizer is strictly an extractor. It never fills a slot the
//! normalizer cannot justify from an entity, and nothing here can fail a
//! turn: malformed payloads degrade to "value not determined".

pub mod client;
pub mod intent;
pub mod normalize;
pub mod pattern;
pub mod recognizer;

pub use client::PredictionClient;
pub use intent::Intent;
pub use normalize::normalize;
pub use pattern::PatternRecognizer;
pub use recognizer::{DateTimeResolution, Recognizer, RecognizerError, RecognizerResult};
