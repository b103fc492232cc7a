//! XHR client module for form submission requests

mod client;
mod traits;

pub use client::{XhrClient, ALLOW_SOURCE_ORIGIN_HEADER, SOURCE_ORIGIN_PARAM};
pub use traits::{Credentials, Deferred, FetchInit, FetchMethod, HttpClient, JsonResponse};

#[cfg(test)]
pub use traits::MockHttpClient;
