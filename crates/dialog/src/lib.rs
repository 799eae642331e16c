//! Slot-filling dialog engine for travel-booking requests.
//!
//! One conversation session is one sequential state machine over a single
//! owned `BookingRequest`. Suspension is data, not a blocked task: every
//! "ask the user" point surfaces as a `Prompt` in the turn outcome, and the
//! surrounding transport feeds the reply back on the next turn.
//!
//! # Layers
//!
//! - `booking::BookingFlow` - the ordered step controller
//!   (destination → origin → dates → budget → confirm)
//! - `date_resolver::DateResolverFlow` - nested sub-dialog that loops until
//!   a date is calendrically definite
//! - `guard::CancellationGuard` - cancel/help interception before any step
//! - `session::DialogSession` - the per-turn inbound surface wiring the
//!   recognizer, normalizer, and flows together

pub mod booking;
pub mod date_resolver;
pub mod guard;
pub mod prompt;
pub mod session;

pub use booking::{BookingFlow, FlowStatus};
pub use date_resolver::{DateResolverFlow, DateSlot, ResolverStatus};
pub use guard::{CancellationGuard, Interruption};
pub use prompt::{parse_confirmation, Prompt, PromptAnswer, PromptKind};
pub use session::{DialogSession, TurnOutcome};
