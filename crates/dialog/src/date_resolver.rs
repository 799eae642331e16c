//! Nested sub-dialog that forces a date to be disambiguated before it is
//! accepted. Instantiated identically for the departure and return slots;
//! only the display text and the slot the parent writes into differ.

use wayfare_core::timex::{date_portion, is_ambiguous};
use wayfare_nlu::DateTimeResolution;

use crate::prompt::Prompt;

pub const RETRY_TEXT: &str = "I'm sorry, for best results, please enter your travel date \
                              including the month, day and year.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateSlot {
    Departure,
    Return,
}

impl DateSlot {
    pub fn open_question(&self) -> &'static str {
        match self {
            Self::Departure => "On what date would you like to travel?",
            Self::Return => "On what date would you like to fly back?",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolverStatus {
    /// Suspended awaiting a date/time reply.
    Waiting(Prompt),
    /// Terminal: the date-only portion of the accepted TIMEX.
    Resolved(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateResolverFlow {
    slot: DateSlot,
}

impl DateResolverFlow {
    /// Entry decision over the optional candidate carried in by the parent:
    /// no candidate asks the open question, an ambiguous candidate is
    /// nudged with the stricter re-prompt, and a definite candidate skips
    /// prompting entirely.
    pub fn begin(slot: DateSlot, candidate: Option<&str>) -> (Self, ResolverStatus) {
        let flow = Self { slot };
        let status = match candidate {
            None => ResolverStatus::Waiting(Prompt::date_time(slot.open_question(), RETRY_TEXT)),
            Some(timex) if is_ambiguous(Some(timex)) => {
                ResolverStatus::Waiting(Prompt::date_time(RETRY_TEXT, RETRY_TEXT))
            }
            Some(timex) => ResolverStatus::Resolved(date_portion(timex).to_string()),
        };
        (flow, status)
    }

    pub fn slot(&self) -> DateSlot {
        self.slot
    }

    /// Validation happens at acceptance time: the first resolution's TIMEX
    /// is reduced to its date portion and must be definite, otherwise the
    /// prompt is re-issued.
    pub fn resume(&self, resolutions: &[DateTimeResolution]) -> ResolverStatus {
        match accept(resolutions) {
            Some(date) => ResolverStatus::Resolved(date),
            None => ResolverStatus::Waiting(Prompt::date_time(RETRY_TEXT, RETRY_TEXT)),
        }
    }
}

fn accept(resolutions: &[DateTimeResolution]) -> Option<String> {
    let date = date_portion(&resolutions.first()?.timex);
    if is_ambiguous(Some(date)) {
        None
    } else {
        Some(date.to_string())
    }
}

#[cfg(test)]
mod tests {
    use wayfare_nlu::DateTimeResolution;

    use crate::date_resolver::{DateResolverFlow, DateSlot, ResolverStatus, RETRY_TEXT};
    use crate::prompt::PromptKind;

    #[test]
    fn no_candidate_asks_the_open_question() {
        let (_, status) = DateResolverFlow::begin(DateSlot::Departure, None);
        match status {
            ResolverStatus::Waiting(prompt) => {
                assert_eq!(prompt.kind, PromptKind::DateTime);
                assert_eq!(prompt.text, "On what date would you like to travel?");
                assert_eq!(prompt.retry_text.as_deref(), Some(RETRY_TEXT));
            }
            other => panic!("expected a prompt, got {other:?}"),
        }
    }

    #[test]
    fn ambiguous_candidate_is_nudged_not_requestioned() {
        let (_, status) = DateResolverFlow::begin(DateSlot::Return, Some("2024-08"));
        match status {
            ResolverStatus::Waiting(prompt) => assert_eq!(prompt.text, RETRY_TEXT),
            other => panic!("expected a prompt, got {other:?}"),
        }
    }

    #[test]
    fn definite_candidate_skips_prompting() {
        let (_, status) = DateResolverFlow::begin(DateSlot::Departure, Some("2024-08-10T09"));
        assert_eq!(status, ResolverStatus::Resolved("2024-08-10".to_string()));
    }

    #[test]
    fn ambiguous_reply_loops_until_a_definite_resubmit() {
        let (flow, _) = DateResolverFlow::begin(DateSlot::Departure, Some("2024-08"));

        let rejected = flow.resume(&[DateTimeResolution::new("2024-08")]);
        assert!(matches!(rejected, ResolverStatus::Waiting(_)));

        let resolved = flow.resume(&[DateTimeResolution::new("2024-08-15")]);
        assert_eq!(resolved, ResolverStatus::Resolved("2024-08-15".to_string()));
    }

    #[test]
    fn empty_reply_is_rejected() {
        let (flow, _) = DateResolverFlow::begin(DateSlot::Return, None);
        assert!(matches!(flow.resume(&[]), ResolverStatus::Waiting(_)));
    }

    #[test]
    fn accepted_value_is_reduced_to_its_date_portion() {
        let (flow, _) = DateResolverFlow::begin(DateSlot::Return, None);
        let resolved = flow.resume(&[DateTimeResolution::new("2024-08-17T16:30")]);
        assert_eq!(resolved, ResolverStatus::Resolved("2024-08-17".to_string()));
    }
}
