//! Declarative form configuration, read from markup once at construction

use crate::dom::{HostElement, Selector};
use crate::error::ConfigurationError;
use reqwest::Url;

/// Attribute holding the XHR submission target
pub const ACTION_XHR_ATTR: &str = "action-xhr";

/// Platform CDN host that form targets must not point at
pub const DEFAULT_CDN_HOST: &str = "cdn.ampproject.org";

/// Selector for controls that submit the form
pub fn submit_control_selector() -> Selector {
    Selector::attribute_equals("input", "type", "submit")
}

/// Rules a submission target must satisfy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPolicy {
    cdn_host: String,
}

impl TargetPolicy {
    pub fn new(cdn_host: &str) -> Self {
        Self {
            cdn_host: cdn_host.trim().to_ascii_lowercase(),
        }
    }

    pub fn cdn_host(&self) -> &str {
        &self.cdn_host
    }

    /// Check a raw `action-xhr` value and return the parsed URL
    pub fn validate(&self, raw: &str) -> Result<Url, ConfigurationError> {
        let url = Url::parse(raw.trim()).map_err(|e| ConfigurationError::InvalidTarget {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "https" {
            return Err(ConfigurationError::InsecureTarget {
                url: raw.to_string(),
            });
        }

        // A fully qualified host ("cdn.ampproject.org.") names the same host
        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
        let host = host.strip_suffix('.').unwrap_or(&host);
        if self.is_cdn_host(host) {
            return Err(ConfigurationError::DisallowedHost {
                cdn_host: self.cdn_host.clone(),
            });
        }

        Ok(url)
    }

    fn is_cdn_host(&self, host: &str) -> bool {
        host == self.cdn_host
            || host
                .strip_suffix(self.cdn_host.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    }
}

impl Default for TargetPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_CDN_HOST)
    }
}

/// Validated, immutable configuration of one form
#[derive(Debug, Clone)]
pub struct SubmitConfig<E> {
    pub target: Url,
    pub triggers: Vec<E>,
}

impl<E: HostElement> SubmitConfig<E> {
    /// Read and validate the configuration declared on `form`
    pub fn from_form(form: &E, policy: &TargetPolicy) -> Result<Self, ConfigurationError> {
        let triggers = form.query_selector_all(&submit_control_selector());
        if triggers.is_empty() {
            return Err(ConfigurationError::MissingSubmitControl);
        }

        let raw = form
            .get_attribute(ACTION_XHR_ATTR)
            .ok_or(ConfigurationError::MissingTarget)?;
        let target = policy.validate(&raw)?;

        Ok(Self { target, triggers })
    }
}
