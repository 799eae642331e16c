//! The ordered slot-fill controller: destination → origin → departure date
//! → return date → budget → confirmation. Steps are a tagged enum driven by
//! an explicit advance loop; a pending `DateResolverFlow` acts as the
//! recorded continuation for the step that invoked it.

use std::sync::Arc;

use wayfare_core::telemetry::{
    NullTelemetrySink, TelemetryEvent, TelemetrySeverity, TelemetrySink, BAD_ANSWER_EVENT,
    GOOD_ANSWER_EVENT,
};
use wayfare_core::BookingRequest;

use crate::date_resolver::{DateResolverFlow, DateSlot, ResolverStatus};
use crate::prompt::{Prompt, PromptAnswer, PromptKind};

pub const DESTINATION_PROMPT: &str = "Where would you like to travel to?";
pub const ORIGIN_PROMPT: &str = "From what city will you be travelling?";
pub const BUDGET_PROMPT: &str = "What is your budget?";
pub const CONFIRM_RETRY_TEXT: &str = "Please answer with yes or no.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Destination,
    Origin,
    DepartureDate,
    ReturnDate,
    Budget,
    Confirm,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FlowStatus {
    /// Suspended awaiting the reply to `Prompt`.
    Waiting(Prompt),
    /// Terminal: affirmative confirmation, booking request handed off.
    Complete(BookingRequest),
    /// Terminal: negative confirmation, request discarded by the caller.
    Declined,
}

pub struct BookingFlow {
    step: Step,
    awaiting: Option<PromptKind>,
    resolver: Option<DateResolverFlow>,
    request: BookingRequest,
    telemetry: Arc<dyn TelemetrySink>,
}

impl BookingFlow {
    /// Starts the flow with a no-op telemetry sink.
    pub fn begin(request: BookingRequest) -> (Self, FlowStatus) {
        Self::begin_with_telemetry(request, Arc::new(NullTelemetrySink))
    }

    /// Starts the flow, runs it until the first suspension point (or all
    /// the way to Confirm when every slot arrived pre-filled).
    pub fn begin_with_telemetry(
        request: BookingRequest,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> (Self, FlowStatus) {
        let mut flow = Self {
            step: Step::Destination,
            awaiting: None,
            resolver: None,
            request,
            telemetry,
        };
        let status = flow.advance(None);
        (flow, status)
    }

    pub fn resume(&mut self, answer: PromptAnswer) -> FlowStatus {
        self.advance(Some(answer))
    }

    pub fn request(&self) -> &BookingRequest {
        &self.request
    }

    fn advance(&mut self, answer: Option<PromptAnswer>) -> FlowStatus {
        if let Some(status) = self.consume(answer) {
            return status;
        }

        loop {
            match self.step {
                Step::Destination => {
                    if BookingRequest::is_filled(&self.request.destination) {
                        self.step = Step::Origin;
                    } else {
                        return self.suspend_text(DESTINATION_PROMPT);
                    }
                }
                Step::Origin => {
                    if BookingRequest::is_filled(&self.request.origin) {
                        self.step = Step::DepartureDate;
                    } else {
                        return self.suspend_text(ORIGIN_PROMPT);
                    }
                }
                Step::DepartureDate => {
                    if BookingRequest::is_date_filled(&self.request.departure_date) {
                        self.step = Step::ReturnDate;
                    } else if let Some(status) = self.delegate_to_resolver(DateSlot::Departure) {
                        return status;
                    }
                }
                Step::ReturnDate => {
                    if BookingRequest::is_date_filled(&self.request.return_date) {
                        self.step = Step::Budget;
                    } else if let Some(status) = self.delegate_to_resolver(DateSlot::Return) {
                        return status;
                    }
                }
                Step::Budget => {
                    if BookingRequest::is_filled(&self.request.budget) {
                        self.step = Step::Confirm;
                    } else {
                        return self.suspend_text(BUDGET_PROMPT);
                    }
                }
                Step::Confirm => {
                    self.awaiting = Some(PromptKind::Confirm);
                    return FlowStatus::Waiting(Prompt::confirm(
                        self.summary(),
                        CONFIRM_RETRY_TEXT,
                    ));
                }
            }
        }
    }

    /// Feeds the incoming answer to whichever continuation is waiting for
    /// it. Returns a status to surface immediately, or `None` to let the
    /// advance loop carry on to the next unfilled step.
    fn consume(&mut self, answer: Option<PromptAnswer>) -> Option<FlowStatus> {
        if let Some(resolver) = self.resolver {
            let resolutions = match answer {
                Some(PromptAnswer::DateTime(resolutions)) => resolutions,
                _ => Vec::new(),
            };
            return match resolver.resume(&resolutions) {
                ResolverStatus::Waiting(prompt) => {
                    self.awaiting = Some(PromptKind::DateTime);
                    Some(FlowStatus::Waiting(prompt))
                }
                ResolverStatus::Resolved(date) => {
                    match resolver.slot() {
                        DateSlot::Departure => {
                            self.request.departure_date = Some(date);
                            self.step = Step::ReturnDate;
                        }
                        DateSlot::Return => {
                            self.request.return_date = Some(date);
                            self.step = Step::Budget;
                        }
                    }
                    self.resolver = None;
                    self.awaiting = None;
                    None
                }
            };
        }

        let kind = self.awaiting.take()?;
        match (self.step, kind, answer) {
            (Step::Destination, PromptKind::Text, Some(PromptAnswer::Text(text))) => {
                if let Some(text) = non_empty(text) {
                    self.request.destination = Some(text);
                    self.step = Step::Origin;
                }
                None
            }
            (Step::Origin, PromptKind::Text, Some(PromptAnswer::Text(text))) => {
                if let Some(text) = non_empty(text) {
                    self.request.origin = Some(text);
                    self.step = Step::DepartureDate;
                }
                None
            }
            (Step::Budget, PromptKind::Text, Some(PromptAnswer::Text(text))) => {
                if let Some(text) = non_empty(text) {
                    self.request.budget = Some(text);
                    self.step = Step::Confirm;
                }
                None
            }
            (Step::Confirm, PromptKind::Confirm, Some(PromptAnswer::Confirm(accepted))) => {
                Some(self.finish(accepted))
            }
            // Type mismatch or absent answer: no information gained, the
            // loop re-issues the prompt for the still-current step.
            _ => None,
        }
    }

    fn delegate_to_resolver(&mut self, slot: DateSlot) -> Option<FlowStatus> {
        let candidate = match slot {
            DateSlot::Departure => self.request.departure_date.as_deref(),
            DateSlot::Return => self.request.return_date.as_deref(),
        };
        let (resolver, status) = DateResolverFlow::begin(slot, candidate);
        match status {
            ResolverStatus::Waiting(prompt) => {
                self.resolver = Some(resolver);
                self.awaiting = Some(PromptKind::DateTime);
                Some(FlowStatus::Waiting(prompt))
            }
            ResolverStatus::Resolved(date) => {
                match slot {
                    DateSlot::Departure => {
                        self.request.departure_date = Some(date);
                        self.step = Step::ReturnDate;
                    }
                    DateSlot::Return => {
                        self.request.return_date = Some(date);
                        self.step = Step::Budget;
                    }
                }
                None
            }
        }
    }

    fn suspend_text(&mut self, text: &str) -> FlowStatus {
        self.awaiting = Some(PromptKind::Text);
        FlowStatus::Waiting(Prompt::text(text))
    }

    /// Exactly one outcome event per terminal transition, with the full
    /// slot snapshot either way.
    fn finish(&mut self, accepted: bool) -> FlowStatus {
        let snapshot = self.request.slot_snapshot();
        if accepted {
            self.telemetry.track(TelemetryEvent::new(
                GOOD_ANSWER_EVENT,
                TelemetrySeverity::Info,
                snapshot,
            ));
            FlowStatus::Complete(self.request.clone())
        } else {
            self.telemetry.track(TelemetryEvent::new(
                BAD_ANSWER_EVENT,
                TelemetrySeverity::Warning,
                snapshot,
            ));
            FlowStatus::Declined
        }
    }

    fn summary(&self) -> String {
        let slot = |value: &Option<String>| value.clone().unwrap_or_else(|| "unknown".to_string());
        format!(
            "Please confirm: flying from {} to {}, departing {}, returning {}, \
             on a budget of {}. Is this correct?",
            slot(&self.request.origin),
            slot(&self.request.destination),
            slot(&self.request.departure_date),
            slot(&self.request.return_date),
            slot(&self.request.budget),
        )
    }
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
