//! Interactive stdin/stdout conversation loop. One process is one session;
//! the booking dialog can be cancelled and restarted any number of times
//! before the loop exits.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use wayfare_core::config::AppConfig;
use wayfare_core::telemetry::{
    NullTelemetrySink, TelemetryEvent, TelemetrySeverity, TelemetrySink,
};
use wayfare_core::BookingRequest;
use wayfare_dialog::{DialogSession, TurnOutcome};
use wayfare_nlu::{PatternRecognizer, PredictionClient, Recognizer};

const GREETING: &str = "What can I help you with today? (say \"quit\" to leave)";
const IDLE_PROMPT: &str = "What else can I do for you?";

/// Forwards dialog outcome events into the tracing pipeline, keeping the
/// event name and slot snapshot as structured fields.
struct TracingTelemetrySink;

impl TelemetrySink for TracingTelemetrySink {
    fn track(&self, event: TelemetryEvent) {
        match event.severity {
            TelemetrySeverity::Info => tracing::info!(
                event_name = %event.name,
                event_id = %event.event_id,
                properties = ?event.properties,
                "telemetry event"
            ),
            TelemetrySeverity::Warning => tracing::warn!(
                event_name = %event.name,
                event_id = %event.event_id,
                properties = ?event.properties,
                "telemetry event"
            ),
        }
    }
}

pub async fn run(config: &AppConfig, remote: bool) -> Result<ExitCode> {
    let telemetry: Arc<dyn TelemetrySink> = if config.telemetry.enabled {
        Arc::new(TracingTelemetrySink)
    } else {
        Arc::new(NullTelemetrySink)
    };

    if remote {
        let client = PredictionClient::from_config(&config.nlu)?;
        repl(DialogSession::with_telemetry(client, telemetry)).await
    } else {
        repl(DialogSession::with_telemetry(PatternRecognizer::new(), telemetry)).await
    }
}

async fn repl<R>(mut session: DialogSession<R>) -> Result<ExitCode>
where
    R: Recognizer,
{
    println!("{GREETING}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        // "quit" inside a booking only unwinds the booking; at the idle
        // prompt it ends the program.
        let was_idle = !session.is_active();
        match session.handle_turn(&line).await {
            TurnOutcome::Prompt(prompt) => println!("{}", prompt.text),
            TurnOutcome::Message(text) => println!("{text}"),
            TurnOutcome::Help { text, reprompt } => {
                println!("{text}");
                if let Some(prompt) = reprompt {
                    println!("{}", prompt.text);
                }
            }
            TurnOutcome::Cancelled(text) => {
                println!("{text}");
                if was_idle {
                    break;
                }
                println!("{IDLE_PROMPT}");
            }
            TurnOutcome::Completed(request) => {
                println!("{}", booking_receipt(&request));
                println!("{IDLE_PROMPT}");
            }
            TurnOutcome::Declined(text) => {
                println!("{text}");
                println!("{IDLE_PROMPT}");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn booking_receipt(request: &BookingRequest) -> String {
    let slot = |value: &Option<String>| value.clone().unwrap_or_else(|| "unknown".to_string());
    format!(
        "I have you booked to {} from {}, departing {} and returning {}, on a budget of {}.",
        slot(&request.destination),
        slot(&request.origin),
        slot(&request.departure_date),
        slot(&request.return_date),
        slot(&request.budget),
    )
}

#[cfg(test)]
mod tests {
    use wayfare_core::BookingRequest;

    use crate::commands::chat::booking_receipt;

    #[test]
    fn receipt_names_every_slot() {
        let request = BookingRequest {
            destination: Some("Paris".to_string()),
            origin: Some("London".to_string()),
            departure_date: Some("2024-08-10".to_string()),
            return_date: Some("2024-08-17".to_string()),
            budget: Some("500 Dollar".to_string()),
            unsupported_locations: Vec::new(),
        };
        let receipt = booking_receipt(&request);
        assert!(receipt.contains("to Paris from London"));
        assert!(receipt.contains("departing 2024-08-10"));
        assert!(receipt.contains("returning 2024-08-17"));
        assert!(receipt.contains("budget of 500 Dollar"));
    }
}
