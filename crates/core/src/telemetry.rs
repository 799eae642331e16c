use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const GOOD_ANSWER_EVENT: &str = "Good answer received";
pub const BAD_ANSWER_EVENT: &str = "Bad answer received";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TelemetrySeverity {
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub event_id: String,
    pub name: String,
    pub severity: TelemetrySeverity,
    pub properties: BTreeMap<String, String>,
    pub occurred_at: DateTime<Utc>,
}

impl TelemetryEvent {
    pub fn new(
        name: impl Into<String>,
        severity: TelemetrySeverity,
        properties: BTreeMap<String, String>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            name: name.into(),
            severity,
            properties,
            occurred_at: Utc::now(),
        }
    }
}

/// Fire-and-forget event capability. Implementations must be safe for
/// concurrent invocation from independent sessions and side-effect-free on
/// failure.
pub trait TelemetrySink: Send + Sync {
    fn track(&self, event: TelemetryEvent);
}

/// Default sink: discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTelemetrySink;

impl TelemetrySink for NullTelemetrySink {
    fn track(&self, _event: TelemetryEvent) {}
}

#[derive(Clone, Default)]
pub struct InMemoryTelemetrySink {
    events: Arc<Mutex<Vec<TelemetryEvent>>>,
}

impl InMemoryTelemetrySink {
    pub fn events(&self) -> Vec<TelemetryEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl TelemetrySink for InMemoryTelemetrySink {
    fn track(&self, event: TelemetryEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::telemetry::{
        InMemoryTelemetrySink, NullTelemetrySink, TelemetryEvent, TelemetrySeverity, TelemetrySink,
    };

    #[test]
    fn in_memory_sink_records_events_with_properties() {
        let sink = InMemoryTelemetrySink::default();
        let mut properties = BTreeMap::new();
        properties.insert("destination".to_string(), "Paris".to_string());

        sink.track(TelemetryEvent::new(
            super::GOOD_ANSWER_EVENT,
            TelemetrySeverity::Info,
            properties,
        ));

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "Good answer received");
        assert_eq!(events[0].severity, TelemetrySeverity::Info);
        assert_eq!(events[0].properties["destination"], "Paris");
    }

    #[test]
    fn null_sink_discards_silently() {
        let sink = NullTelemetrySink;
        sink.track(TelemetryEvent::new(
            super::BAD_ANSWER_EVENT,
            TelemetrySeverity::Warning,
            BTreeMap::new(),
        ));
    }
}
