/// Cross-cutting interrupt handling, checked once per turn before any step
/// dispatches. Cancel unwinds the entire dialog stack regardless of which
/// step was active; help answers without consuming the pending prompt.
#[derive(Clone, Copy, Debug, Default)]
pub struct CancellationGuard;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interruption {
    Cancel,
    Help,
}

pub const CANCEL_TEXT: &str = "Cancelling...";
pub const HELP_TEXT: &str =
    "I can help you book a flight. Tell me where you want to go, where from, \
     your travel dates, and your budget. Say \"cancel\" to stop at any time.";

impl CancellationGuard {
    /// Exact keyword match on the trimmed, lowercased turn text. Substring
    /// matching is deliberately avoided so "cancellation policy?" does not
    /// tear down the dialog.
    pub fn inspect(raw_text: &str) -> Option<Interruption> {
        match raw_text.trim().to_ascii_lowercase().as_str() {
            "cancel" | "quit" => Some(Interruption::Cancel),
            "help" | "?" => Some(Interruption::Help),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::guard::{CancellationGuard, Interruption};

    #[test]
    fn cancel_and_quit_unwind() {
        assert_eq!(CancellationGuard::inspect("cancel"), Some(Interruption::Cancel));
        assert_eq!(CancellationGuard::inspect("  QUIT "), Some(Interruption::Cancel));
    }

    #[test]
    fn help_keywords_interrupt_without_cancelling() {
        assert_eq!(CancellationGuard::inspect("help"), Some(Interruption::Help));
        assert_eq!(CancellationGuard::inspect("?"), Some(Interruption::Help));
    }

    #[test]
    fn ordinary_answers_pass_through() {
        assert_eq!(CancellationGuard::inspect("Paris"), None);
        assert_eq!(CancellationGuard::inspect("what is the cancellation policy?"), None);
    }
}
