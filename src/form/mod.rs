//! Form submission domain layer
//!
//! Validates a form's declared target, then drives submissions through the
//! single-flight [`SubmissionController`].

mod config;
mod controller;
mod state;

pub use config::{
    submit_control_selector, SubmitConfig, TargetPolicy, ACTION_XHR_ATTR, DEFAULT_CDN_HOST,
};
pub use controller::{SubmissionController, DISABLED_ATTR};
pub use state::{
    SubmitState, STATE_CLASSES, SUBMITTING_CLASS, SUBMIT_ERROR_CLASS, SUBMIT_SUCCESS_CLASS,
};
