//! reqwest-backed XHR client
//!
//! Issues JSON requests for form submissions. When a request requires the
//! response to assert its source origin, the origin is sent as the
//! `__amp_source_origin` query parameter and the response must echo it back
//! in the `AMP-Access-Control-Allow-Source-Origin` header.

use super::traits::{Credentials, Deferred, FetchInit, FetchMethod, HttpClient, JsonResponse};
use crate::config::Settings;
use crate::error::SubmissionError;
use anyhow::{anyhow, Result};
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Method, Url};

/// Query parameter carrying the requesting document's origin
pub const SOURCE_ORIGIN_PARAM: &str = "__amp_source_origin";

/// Response header that must echo the source origin
pub const ALLOW_SOURCE_ORIGIN_HEADER: &str = "amp-access-control-allow-source-origin";

/// Client used by the form controller outside of tests
#[derive(Debug, Clone)]
pub struct XhrClient {
    /// Sends cookies (`credentials: include`)
    with_cookies: reqwest::Client,
    /// Never sends cookies
    without_cookies: reqwest::Client,
    /// Origin of the document hosting the form
    source_origin: Option<String>,
}

impl XhrClient {
    /// Create a client from user settings
    pub fn new(settings: &Settings) -> Result<Self> {
        let timeout = settings.request_timeout();

        let with_cookies = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;
        let without_cookies = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        let source_origin = match settings.source_origin.as_deref() {
            Some(raw) => Some(normalize_origin(raw)?),
            None => None,
        };

        Ok(Self {
            with_cookies,
            without_cookies,
            source_origin,
        })
    }

    pub fn source_origin(&self) -> Option<&str> {
        self.source_origin.as_deref()
    }

    fn client_for(&self, credentials: Credentials) -> reqwest::Client {
        match credentials {
            Credentials::Include => self.with_cookies.clone(),
            Credentials::Omit | Credentials::SameOrigin => self.without_cookies.clone(),
        }
    }
}

impl HttpClient for XhrClient {
    fn fetch_json(&self, url: &Url, init: &FetchInit) -> Deferred<JsonResponse> {
        let client = self.client_for(init.credentials);
        let method = to_method(init.method);
        let expected_origin = if init.require_amp_response_source_origin {
            match self.source_origin.clone() {
                Some(origin) => Some(origin),
                None => {
                    return Box::pin(async {
                        Err::<JsonResponse, _>(SubmissionError::SourceOriginUnavailable)
                    })
                }
            }
        } else {
            None
        };
        let request_url = match &expected_origin {
            Some(origin) => with_source_origin(url, origin),
            None => url.clone(),
        };

        tracing::debug!(url = %request_url, method = init.method.as_str(), "Sending XHR");

        Box::pin(async move {
            let response = client
                .request(method, request_url)
                .header(ACCEPT, "application/json")
                .send()
                .await
                .map_err(|e| SubmissionError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(SubmissionError::Status(status.as_u16()));
            }
            if let Some(expected) = expected_origin {
                verify_source_origin(response.headers(), &expected)?;
            }

            let body = response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| SubmissionError::InvalidJson(e.to_string()))?;

            Ok::<_, SubmissionError>(JsonResponse {
                status: status.as_u16(),
                body,
            })
        })
    }
}

fn to_method(method: FetchMethod) -> Method {
    match method {
        FetchMethod::Get => Method::GET,
        FetchMethod::Post => Method::POST,
    }
}

/// Reduce a configured origin like `https://example.com/page` to
/// `https://example.com`
fn normalize_origin(raw: &str) -> Result<String> {
    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid source origin {:?}: {}", raw, e))?;
    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(anyhow!("Source origin {:?} has no host", raw));
    }
    Ok(origin.ascii_serialization())
}

/// Append the source origin query parameter, replacing any existing one
fn with_source_origin(url: &Url, origin: &str) -> Url {
    let mut out = url.clone();
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != SOURCE_ORIGIN_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    out.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(SOURCE_ORIGIN_PARAM, origin);
    out
}

fn verify_source_origin(headers: &HeaderMap, expected: &str) -> Result<(), SubmissionError> {
    let actual = headers
        .get(ALLOW_SOURCE_ORIGIN_HEADER)
        .and_then(|v| v.to_str().ok());
    if actual == Some(expected) {
        return Ok(());
    }
    Err(SubmissionError::SourceOriginMismatch {
        expected: expected.to_string(),
        actual: actual.map(str::to_string),
    })
}
