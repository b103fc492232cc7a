//! Trait abstraction for the XHR client to enable mocking in tests

use crate::error::SubmissionError;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Eventual result of a request. Owns everything it needs, so it can be
/// driven after the call that produced it has returned.
pub type Deferred<T> = Pin<Box<dyn Future<Output = Result<T, SubmissionError>>>>;

/// HTTP method of a form request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FetchMethod {
    #[default]
    Get,
    Post,
}

impl FetchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Cookie policy of a request, named after the fetch API values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Credentials {
    Omit,
    #[default]
    SameOrigin,
    Include,
}

impl Credentials {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Omit => "omit",
            Self::SameOrigin => "same-origin",
            Self::Include => "include",
        }
    }
}

/// Request options understood by [`HttpClient::fetch_json`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchInit {
    pub method: FetchMethod,
    pub credentials: Credentials,
    /// The response must assert the requesting document's source origin
    pub require_amp_response_source_origin: bool,
}

impl FetchInit {
    /// Options every form submission uses
    pub fn form_submission() -> Self {
        Self {
            method: FetchMethod::Get,
            credentials: Credentials::Include,
            require_amp_response_source_origin: true,
        }
    }
}

/// A decoded JSON response
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsonResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

/// Trait for XHR operations, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient {
    /// Start a JSON request. The request is issued when this is called; the
    /// returned deferred settles with the response or the failure.
    fn fetch_json(&self, url: &Url, init: &FetchInit) -> Deferred<JsonResponse>;
}
