//! Event reporting: structured lifecycle events fanned out to external sinks.
//!
//! Delivery is fire-and-forget. A sink that fails is logged and skipped,
//! never retried, and never allowed to stall playback or the remaining
//! sinks. Every tracked event is also republished to observer callbacks so a
//! host can listen without coupling to any sink.

use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::model::{EventAttributes, EventKind, TourEvent};

/// Errors a remote sink can report. Swallowed by the reporter.
#[derive(Debug, thiserror::Error)]
#[error("event delivery failed: {0}")]
pub struct DeliveryError(pub String);

/// A destination for tracked events, e.g. a remote analytics endpoint.
pub trait EventSink {
    fn deliver(&mut self, event: &TourEvent) -> Result<(), DeliveryError>;
}

/// Host-side listener invoked after sink delivery, with the same event.
pub type EventObserver = Box<dyn FnMut(&TourEvent)>;

/// Stamps, logs, and fans out playback events for one tour session.
pub struct EventReporter {
    tour_id: String,
    session_id: Uuid,
    clock: Box<dyn Clock>,
    sinks: Vec<Box<dyn EventSink>>,
    observers: Vec<EventObserver>,
}

impl EventReporter {
    /// A reporter for `tour_id` with a fresh session identity.
    pub fn new(tour_id: impl Into<String>) -> Self {
        Self::with_clock(tour_id, Box::new(SystemClock))
    }

    /// A reporter with an explicit clock, for hosts and tests that control
    /// time.
    pub fn with_clock(tour_id: impl Into<String>, clock: Box<dyn Clock>) -> Self {
        Self {
            tour_id: tour_id.into(),
            session_id: Uuid::new_v4(),
            clock,
            sinks: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Registers a delivery sink.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Registers an observer callback.
    pub fn add_observer(&mut self, observer: EventObserver) {
        self.observers.push(observer);
    }

    /// The session identity stamped on every event from this reporter.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Records an event: stamps identity and time, delivers to every sink
    /// (best-effort), then notifies observers.
    pub fn track(&mut self, kind: EventKind, attributes: EventAttributes) {
        let event = TourEvent {
            tour_id: self.tour_id.clone(),
            session_id: self.session_id,
            kind,
            step_id: attributes.step_id,
            step_index: attributes.step_index,
            timestamp: self.clock.now(),
            metadata: attributes.metadata,
        };

        log::debug!(
            "tour event {:?} (tour {}, step {:?})",
            event.kind,
            event.tour_id,
            event.step_index
        );

        for sink in &mut self.sinks {
            if let Err(e) = sink.deliver(&event) {
                log::warn!("failed to deliver tour event: {e}");
            }
        }

        for observer in &mut self.observers {
            observer(&event);
        }
    }
}
