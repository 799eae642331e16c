use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::timex::is_ambiguous;

/// The mutable aggregate of slot values assembled across a conversation.
/// Owned exclusively by the active session; handed off intact on success or
/// discarded on decline/cancel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub destination: Option<String>,
    pub origin: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub budget: Option<String>,
    /// Location mentions the recognizer could not map to a known geography.
    /// Insertion order is discovery order; never deduplicated.
    pub unsupported_locations: Vec<String>,
}

impl BookingRequest {
    /// A slot is filled iff its value is non-empty.
    pub fn is_filled(value: &Option<String>) -> bool {
        value.as_deref().is_some_and(|value| !value.trim().is_empty())
    }

    /// Date slots count as filled only when the value is calendrically
    /// definite; an ambiguous value still needs the resolver.
    pub fn is_date_filled(value: &Option<String>) -> bool {
        !is_ambiguous(value.as_deref())
    }

    pub fn record_unsupported_location(&mut self, mention: impl Into<String>) {
        self.unsupported_locations.push(mention.into());
    }

    /// Snapshot of the five slots for telemetry properties. Unset slots map
    /// to an empty string so the property set is stable across events.
    pub fn slot_snapshot(&self) -> BTreeMap<String, String> {
        let mut snapshot = BTreeMap::new();
        snapshot.insert("destination".to_string(), self.destination.clone().unwrap_or_default());
        snapshot.insert("origin".to_string(), self.origin.clone().unwrap_or_default());
        snapshot.insert(
            "departure_date".to_string(),
            self.departure_date.clone().unwrap_or_default(),
        );
        snapshot.insert("return_date".to_string(), self.return_date.clone().unwrap_or_default());
        snapshot.insert("budget".to_string(), self.budget.clone().unwrap_or_default());
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::booking::BookingRequest;

    #[test]
    fn empty_and_whitespace_slots_are_not_filled() {
        assert!(!BookingRequest::is_filled(&None));
        assert!(!BookingRequest::is_filled(&Some(String::new())));
        assert!(!BookingRequest::is_filled(&Some("  ".to_string())));
        assert!(BookingRequest::is_filled(&Some("Paris".to_string())));
    }

    #[test]
    fn ambiguous_date_does_not_count_as_filled() {
        assert!(!BookingRequest::is_date_filled(&Some("2024-08".to_string())));
        assert!(BookingRequest::is_date_filled(&Some("2024-08-15".to_string())));
    }

    #[test]
    fn unsupported_locations_keep_order_and_duplicates() {
        let mut request = BookingRequest::default();
        request.record_unsupported_location("Gotham");
        request.record_unsupported_location("Atlantis");
        request.record_unsupported_location("Gotham");
        assert_eq!(request.unsupported_locations, vec!["Gotham", "Atlantis", "Gotham"]);
    }

    #[test]
    fn snapshot_always_carries_all_five_slots() {
        let request = BookingRequest {
            destination: Some("Paris".to_string()),
            budget: Some("500 Dollar".to_string()),
            ..BookingRequest::default()
        };

        let snapshot = request.slot_snapshot();
        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot["destination"], "Paris");
        assert_eq!(snapshot["origin"], "");
        assert_eq!(snapshot["budget"], "500 Dollar");
    }
}
