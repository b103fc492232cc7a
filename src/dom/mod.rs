//! Host document abstractions
//!
//! The controller talks to its form through [`HostElement`] and receives
//! submissions as [`Event`]s. [`Element`] is an in-memory host used by the
//! demo binary and tests.

mod element;
mod event;
mod selector;

pub use element::{Element, HostElement};
pub use event::{Event, EventListener, ListenerId, SyntheticEvent, SUBMIT_EVENT};
pub use selector::Selector;

#[cfg(test)]
pub use event::MockEvent;
