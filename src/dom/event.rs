//! Event and listener abstractions for the host element

use std::cell::Cell;

/// Event type fired when a form is submitted
pub const SUBMIT_EVENT: &str = "submit";

/// Handle identifying a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The part of a DOM event the form controller consumes
#[cfg_attr(test, mockall::automock)]
pub trait Event {
    /// Whether an earlier handler already cancelled the default action
    fn default_prevented(&self) -> bool;

    /// Cancel the default action (native navigation for submit events)
    fn prevent_default(&self);
}

/// Receiver of dispatched events
pub trait EventListener {
    fn handle_event(&self, event: &dyn Event);
}

impl<F> EventListener for F
where
    F: Fn(&dyn Event),
{
    fn handle_event(&self, event: &dyn Event) {
        self(event)
    }
}

/// A plain event as produced by [`crate::dom::Element::dispatch_event`]
#[derive(Debug, Default)]
pub struct SyntheticEvent {
    event_type: String,
    default_prevented: Cell<bool>,
}

impl SyntheticEvent {
    pub fn new(event_type: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            default_prevented: Cell::new(false),
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }
}

impl Event for SyntheticEvent {
    fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    fn prevent_default(&self) {
        self.default_prevented.set(true);
    }
}
