//! Per-session turn handling: one `DialogSession` per conversation, each
//! turn processed to completion before the next is accepted. Sessions share
//! nothing mutable; the recognizer and telemetry sink are the only shared
//! collaborators and both are safe for concurrent use.

use std::sync::Arc;

use tracing::warn;

use wayfare_core::telemetry::{NullTelemetrySink, TelemetrySink};
use wayfare_core::BookingRequest;
use wayfare_nlu::{normalize, Intent, Recognizer};

use crate::booking::{BookingFlow, FlowStatus};
use crate::guard::{CancellationGuard, Interruption, CANCEL_TEXT, HELP_TEXT};
use crate::prompt::{parse_confirmation, Prompt, PromptAnswer, PromptKind};

pub const REPHRASE_TEXT: &str =
    "Sorry, I didn't get that. Please try rephrasing what you need.";
pub const WEATHER_TEXT: &str = "The weather forecast is not available yet.";
pub const NOTHING_TO_CANCEL_TEXT: &str = "There is nothing to cancel right now.";
pub const DECLINED_TEXT: &str = "Okay, I have discarded that request.";

/// What one turn produced for the surrounding transport to render.
#[derive(Clone, Debug, PartialEq)]
pub enum TurnOutcome {
    /// Suspended: display the prompt and await the next turn.
    Prompt(Prompt),
    /// Informational reply; the conversation is idle.
    Message(String),
    /// Help was requested; the pending prompt, if any, is re-issued.
    Help { text: String, reprompt: Option<Prompt> },
    /// The whole dialog stack was unwound.
    Cancelled(String),
    /// Terminal success: the completed request, handed off intact.
    Completed(BookingRequest),
    /// Terminal decline at confirmation; no result payload.
    Declined(String),
}

pub struct DialogSession<R> {
    recognizer: R,
    telemetry: Arc<dyn TelemetrySink>,
    flow: Option<BookingFlow>,
    pending: Option<Prompt>,
}

impl<R> DialogSession<R>
where
    R: Recognizer,
{
    pub fn new(recognizer: R) -> Self {
        Self::with_telemetry(recognizer, Arc::new(NullTelemetrySink))
    }

    pub fn with_telemetry(recognizer: R, telemetry: Arc<dyn TelemetrySink>) -> Self {
        Self { recognizer, telemetry, flow: None, pending: None }
    }

    /// True while a booking dialog is suspended awaiting input.
    pub fn is_active(&self) -> bool {
        self.flow.is_some()
    }

    pub async fn handle_turn(&mut self, raw_text: &str) -> TurnOutcome {
        // Interrupts are checked before any step dispatch, never mid-step.
        if let Some(interruption) = CancellationGuard::inspect(raw_text) {
            return match interruption {
                Interruption::Cancel => {
                    self.flow = None;
                    self.pending = None;
                    TurnOutcome::Cancelled(CANCEL_TEXT.to_string())
                }
                Interruption::Help => TurnOutcome::Help {
                    text: HELP_TEXT.to_string(),
                    reprompt: self.pending.clone(),
                },
            };
        }

        if self.flow.is_some() {
            self.resume_flow(raw_text).await
        } else {
            self.open_conversation(raw_text).await
        }
    }

    async fn open_conversation(&mut self, raw_text: &str) -> TurnOutcome {
        let result = match self.recognizer.recognize(raw_text).await {
            Ok(result) => result,
            Err(error) => {
                // Recognition failure means no information gained this
                // turn; the user is simply asked again.
                warn!(%error, "recognizer call failed");
                return TurnOutcome::Message(REPHRASE_TEXT.to_string());
            }
        };

        let (intent, seeded) = normalize(&result);
        match intent {
            Intent::BookFlight => {
                let request = seeded.unwrap_or_default();
                let (flow, status) =
                    BookingFlow::begin_with_telemetry(request, self.telemetry.clone());
                self.flow = Some(flow);
                self.finish_turn(status)
            }
            // Idle sessions have no dialog to unwind; announcing a
            // cancellation here would fabricate one.
            Intent::Cancel => TurnOutcome::Message(NOTHING_TO_CANCEL_TEXT.to_string()),
            Intent::GetWeather => TurnOutcome::Message(WEATHER_TEXT.to_string()),
            Intent::NoneIntent => TurnOutcome::Message(REPHRASE_TEXT.to_string()),
        }
    }

    async fn resume_flow(&mut self, raw_text: &str) -> TurnOutcome {
        let kind = self.pending.as_ref().map(|prompt| prompt.kind).unwrap_or(PromptKind::Text);
        let answer = match kind {
            PromptKind::Text => PromptAnswer::Text(raw_text.trim().to_string()),
            PromptKind::Confirm => match parse_confirmation(raw_text) {
                Some(accepted) => PromptAnswer::Confirm(accepted),
                None => return self.reissue_pending(),
            },
            PromptKind::DateTime => match self.recognizer.resolve_datetime(raw_text).await {
                Ok(resolutions) => PromptAnswer::DateTime(resolutions),
                Err(error) => {
                    warn!(%error, "date resolution failed");
                    return self.reissue_pending();
                }
            },
        };

        let status = match self.flow.as_mut() {
            Some(flow) => flow.resume(answer),
            None => return TurnOutcome::Message(REPHRASE_TEXT.to_string()),
        };
        self.finish_turn(status)
    }

    /// Re-ask without advancing: the stricter retry text when the prompt
    /// carries one, the original question otherwise.
    fn reissue_pending(&self) -> TurnOutcome {
        match &self.pending {
            Some(prompt) => {
                let text = prompt.retry_text.clone().unwrap_or_else(|| prompt.text.clone());
                TurnOutcome::Prompt(Prompt {
                    kind: prompt.kind,
                    text,
                    retry_text: prompt.retry_text.clone(),
                })
            }
            None => TurnOutcome::Message(REPHRASE_TEXT.to_string()),
        }
    }

    fn finish_turn(&mut self, status: FlowStatus) -> TurnOutcome {
        match status {
            FlowStatus::Waiting(prompt) => {
                self.pending = Some(prompt.clone());
                TurnOutcome::Prompt(prompt)
            }
            FlowStatus::Complete(request) => {
                self.flow = None;
                self.pending = None;
                TurnOutcome::Completed(request)
            }
            FlowStatus::Declined => {
                self.flow = None;
                self.pending = None;
                TurnOutcome::Declined(DECLINED_TEXT.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use wayfare_nlu::{
        PatternRecognizer, Recognizer, RecognizerError, RecognizerResult,
    };

    use crate::prompt::PromptKind;
    use crate::session::{DialogSession, TurnOutcome, NOTHING_TO_CANCEL_TEXT, REPHRASE_TEXT};

    struct FailingRecognizer;

    #[async_trait]
    impl Recognizer for FailingRecognizer {
        async fn recognize(&self, _utterance: &str) -> Result<RecognizerResult, RecognizerError> {
            Err(RecognizerError::Transport("connection refused".to_string()))
        }
    }

    fn expect_prompt(outcome: TurnOutcome) -> crate::prompt::Prompt {
        match outcome {
            TurnOutcome::Prompt(prompt) => prompt,
            other => panic!("expected a prompt, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn recognizer_failure_degrades_to_a_reprompt() {
        let mut session = DialogSession::new(FailingRecognizer);
        let outcome = session.handle_turn("book a flight to paris").await;
        assert_eq!(outcome, TurnOutcome::Message(REPHRASE_TEXT.to_string()));
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn help_reissues_the_pending_prompt() {
        let mut session = DialogSession::new(PatternRecognizer::new());
        let first = expect_prompt(session.handle_turn("book a flight").await);

        let outcome = session.handle_turn("help").await;
        match outcome {
            TurnOutcome::Help { reprompt, .. } => {
                assert_eq!(reprompt.expect("pending prompt").text, first.text);
            }
            other => panic!("expected help, got {other:?}"),
        }
        assert!(session.is_active());
    }

    #[tokio::test]
    async fn cancel_phrasing_at_an_idle_session_does_not_fabricate_a_cancellation() {
        let mut session = DialogSession::new(PatternRecognizer::new());
        let outcome = session.handle_turn("cancel the request please").await;
        assert_eq!(outcome, TurnOutcome::Message(NOTHING_TO_CANCEL_TEXT.to_string()));
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn cancel_unwinds_the_whole_stack() {
        let mut session = DialogSession::new(PatternRecognizer::new());
        let _ = session.handle_turn("book a flight to paris").await;
        assert!(session.is_active());

        let outcome = session.handle_turn("cancel").await;
        assert!(matches!(outcome, TurnOutcome::Cancelled(_)));
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn gibberish_at_confirmation_reissues_with_retry_text() {
        let mut session = DialogSession::new(PatternRecognizer::new());
        let _ = session
            .handle_turn("book a flight to paris from london on 2024-08-10 under $500")
            .await;
        // Only the return date is missing; answer it to reach Confirm.
        let prompt = expect_prompt(session.handle_turn("2024-08-17").await);
        assert_eq!(prompt.kind, PromptKind::Confirm);

        let retry = expect_prompt(session.handle_turn("hmm what").await);
        assert_eq!(retry.kind, PromptKind::Confirm);
        assert_eq!(retry.text, "Please answer with yes or no.");
    }

    #[tokio::test]
    async fn weather_and_unknown_intents_answer_without_starting_a_flow() {
        let mut session = DialogSession::new(PatternRecognizer::new());

        let weather = session.handle_turn("what's the weather like?").await;
        assert!(matches!(weather, TurnOutcome::Message(_)));

        let unknown = session.handle_turn("tell me a joke").await;
        assert_eq!(unknown, TurnOutcome::Message(REPHRASE_TEXT.to_string()));
        assert!(!session.is_active());
    }
}
