//! amp-form - XHR form submission with a single-flight guard
//!
//! Wraps a form element, validates its `action-xhr` target, intercepts submit
//! events and sends one JSON request at a time, reflecting progress through
//! `amp-form-*` state classes and disabled submit controls.

pub mod config;
pub mod dom;
pub mod error;
pub mod form;
pub mod xhr;

pub use config::Settings;
pub use error::{ConfigurationError, SubmissionError};
pub use form::{SubmissionController, SubmitState, TargetPolicy};
pub use xhr::{HttpClient, XhrClient};
