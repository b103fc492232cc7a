//! Submission state machine states

use std::fmt;

/// Class applied to the form while a request is in flight
pub const SUBMITTING_CLASS: &str = "amp-form-submitting";
/// Class applied after a successful submission
pub const SUBMIT_SUCCESS_CLASS: &str = "amp-form-submit-success";
/// Class applied after a failed submission
pub const SUBMIT_ERROR_CLASS: &str = "amp-form-submit-error";

/// Classes of which at most one is present on the form at a time
pub const STATE_CLASSES: [&str; 3] = [SUBMITTING_CLASS, SUBMIT_SUCCESS_CLASS, SUBMIT_ERROR_CLASS];

/// Lifecycle state of a form controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Initial,
    Submitting,
    SubmitSuccess,
    SubmitError,
}

impl SubmitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Submitting => "submitting",
            Self::SubmitSuccess => "submit-success",
            Self::SubmitError => "submit-error",
        }
    }

    /// Form class reflecting this state, if any
    pub fn class(&self) -> Option<&'static str> {
        match self {
            Self::Initial => None,
            Self::Submitting => Some(SUBMITTING_CLASS),
            Self::SubmitSuccess => Some(SUBMIT_SUCCESS_CLASS),
            Self::SubmitError => Some(SUBMIT_ERROR_CLASS),
        }
    }

    /// Whether an attempt has finished, successfully or not
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::SubmitSuccess | Self::SubmitError)
    }
}

impl fmt::Display for SubmitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
