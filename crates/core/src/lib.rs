pub mod config;
pub mod domain;
pub mod telemetry;
pub mod timex;

pub use domain::booking::BookingRequest;
pub use telemetry::{
    InMemoryTelemetrySink, NullTelemetrySink, TelemetryEvent, TelemetrySeverity, TelemetrySink,
};
pub use timex::{is_ambiguous, ResolutionType, TemporalExpression};
