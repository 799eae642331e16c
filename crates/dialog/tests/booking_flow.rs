//! End-to-end conversations driven through `DialogSession` with the
//! deterministic keyword recognizer standing in for the hosted service.

use std::sync::Arc;

use wayfare_core::telemetry::{InMemoryTelemetrySink, TelemetrySeverity};
use wayfare_dialog::{DialogSession, Prompt, PromptKind, TurnOutcome};
use wayfare_nlu::PatternRecognizer;

fn session_with_sink() -> (DialogSession<PatternRecognizer>, Arc<InMemoryTelemetrySink>) {
    let sink = Arc::new(InMemoryTelemetrySink::default());
    let session = DialogSession::with_telemetry(PatternRecognizer::new(), sink.clone());
    (session, sink)
}

fn expect_prompt(outcome: TurnOutcome) -> Prompt {
    match outcome {
        TurnOutcome::Prompt(prompt) => prompt,
        other => panic!("expected a prompt, got {other:?}"),
    }
}

#[tokio::test]
async fn happy_path_fills_every_slot_and_records_one_good_event() {
    let (mut session, sink) = session_with_sink();

    let prompt = expect_prompt(session.handle_turn("I'd like to book a flight").await);
    assert_eq!(prompt.text, "Where would you like to travel to?");

    let prompt = expect_prompt(session.handle_turn("paris").await);
    assert_eq!(prompt.text, "From what city will you be travelling?");

    let prompt = expect_prompt(session.handle_turn("london").await);
    assert_eq!(prompt.text, "On what date would you like to travel?");
    assert_eq!(prompt.kind, PromptKind::DateTime);

    let prompt = expect_prompt(session.handle_turn("2024-08-10").await);
    assert_eq!(prompt.text, "On what date would you like to fly back?");

    let prompt = expect_prompt(session.handle_turn("2024-08-17").await);
    assert_eq!(prompt.text, "What is your budget?");

    let prompt = expect_prompt(session.handle_turn("500 USD").await);
    assert_eq!(prompt.kind, PromptKind::Confirm);
    assert!(prompt.text.contains("flying from london to paris"));

    let outcome = session.handle_turn("yes").await;
    let request = match outcome {
        TurnOutcome::Completed(request) => request,
        other => panic!("expected completion, got {other:?}"),
    };
    assert_eq!(request.destination.as_deref(), Some("paris"));
    assert_eq!(request.origin.as_deref(), Some("london"));
    assert_eq!(request.departure_date.as_deref(), Some("2024-08-10"));
    assert_eq!(request.return_date.as_deref(), Some("2024-08-17"));
    assert_eq!(request.budget.as_deref(), Some("500 USD"));

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "Good answer received");
    assert_eq!(events[0].severity, TelemetrySeverity::Info);
    assert!(!session.is_active());
}

#[tokio::test]
async fn decline_at_confirmation_records_one_warning_and_no_result() {
    let (mut session, sink) = session_with_sink();

    let prompt = expect_prompt(
        session
            .handle_turn("book a flight to paris from london on 2024-08-10 under $500")
            .await,
    );
    assert_eq!(prompt.text, "On what date would you like to fly back?");

    let prompt = expect_prompt(session.handle_turn("2024-08-17").await);
    assert_eq!(prompt.kind, PromptKind::Confirm);

    let outcome = session.handle_turn("no").await;
    assert!(matches!(outcome, TurnOutcome::Declined(_)));
    assert!(!session.is_active());

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "Bad answer received");
    assert_eq!(events[0].severity, TelemetrySeverity::Warning);
    assert_eq!(events[0].properties["destination"], "Paris");
}

#[tokio::test]
async fn cancel_mid_flow_unwinds_without_any_outcome_event() {
    let (mut session, sink) = session_with_sink();

    let _ = session.handle_turn("book a trip to paris").await;
    let _ = session.handle_turn("london").await;
    assert!(session.is_active());

    let outcome = session.handle_turn("cancel").await;
    assert_eq!(outcome, TurnOutcome::Cancelled("Cancelling...".to_string()));
    assert!(!session.is_active());
    assert!(sink.events().is_empty());

    // A fresh booking can start in the same session afterwards.
    let prompt = expect_prompt(session.handle_turn("book a flight").await);
    assert_eq!(prompt.text, "Where would you like to travel to?");
}

#[tokio::test]
async fn ambiguous_seeded_date_is_renegotiated_before_confirmation() {
    let (mut session, _) = session_with_sink();

    let prompt = expect_prompt(
        session
            .handle_turn("fly from london to paris on 2024-08 for 500 dollars")
            .await,
    );
    // A month without a day is carried in but not accepted as-is.
    assert!(prompt.text.contains("month, day and year"));

    let prompt = expect_prompt(session.handle_turn("sometime in august").await);
    assert!(prompt.text.contains("month, day and year"));

    let prompt = expect_prompt(session.handle_turn("2024-08-15").await);
    assert_eq!(prompt.text, "On what date would you like to fly back?");

    let prompt = expect_prompt(session.handle_turn("2024-08-22").await);
    assert_eq!(prompt.kind, PromptKind::Confirm);
    assert!(prompt.text.contains("departing 2024-08-15"));
    assert!(prompt.text.contains("returning 2024-08-22"));
}

#[tokio::test]
async fn unknown_destination_is_set_aside_and_asked_again() {
    let (mut session, _) = session_with_sink();

    let prompt = expect_prompt(session.handle_turn("book a trip to gotham from london").await);
    // The unrecognized city does not fill the slot.
    assert_eq!(prompt.text, "Where would you like to travel to?");

    let prompt = expect_prompt(session.handle_turn("paris").await);
    assert_eq!(prompt.kind, PromptKind::DateTime);
}

#[tokio::test]
async fn help_answers_and_reissues_the_pending_question() {
    let (mut session, _) = session_with_sink();

    let first = expect_prompt(session.handle_turn("book a flight").await);

    let outcome = session.handle_turn("help").await;
    match outcome {
        TurnOutcome::Help { text, reprompt } => {
            assert!(text.contains("book a flight"));
            assert_eq!(reprompt.expect("pending prompt").text, first.text);
        }
        other => panic!("expected help, got {other:?}"),
    }

    // The dialog picks up exactly where it left off.
    let prompt = expect_prompt(session.handle_turn("rome").await);
    assert_eq!(prompt.text, "From what city will you be travelling?");
}
