//! Error types for form configuration and submission

use thiserror::Error;

/// Construction-time errors. A controller is never built when one of these
/// is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The form has no `<input type=submit>` descendant
    #[error("form requires at least one <input type=submit>")]
    MissingSubmitControl,

    /// The form does not declare an `action-xhr` attribute
    #[error("form requires an action-xhr attribute")]
    MissingTarget,

    /// The declared target is not an absolute URL
    #[error("form action-xhr must be an absolute URL: {url} ({reason})")]
    InvalidTarget { url: String, reason: String },

    /// The declared target does not use https
    #[error("form action-xhr must start with https:// (got {url})")]
    InsecureTarget { url: String },

    /// The declared target lives on the platform CDN
    #[error("form action-xhr should not be on {cdn_host}")]
    DisallowedHost { cdn_host: String },
}

/// Failures of a single submission request. These are absorbed into the
/// `submit-error` state and never returned from submit handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The request could not be sent or the connection failed
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("request failed with status {0}")]
    Status(u16),

    /// A source-origin check was required but no source origin is configured
    #[error("response source origin required but no source origin is configured")]
    SourceOriginUnavailable,

    /// The response did not assert the expected source origin
    #[error("response source origin mismatch: expected {expected}, got {actual:?}")]
    SourceOriginMismatch {
        expected: String,
        actual: Option<String>,
    },

    /// The response body was not valid JSON
    #[error("invalid JSON response: {0}")]
    InvalidJson(String),

    /// The deferred was dropped before it settled
    #[error("request aborted before completion")]
    Aborted,

    /// The task set that drives requests was dropped, so none was sent
    #[error("no task set is available to run the request")]
    Unscheduled,
}
