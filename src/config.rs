//! Configuration handling for form submission

use crate::form::TargetPolicy;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Request timeout used when none is configured
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// User configuration for form submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Host of the platform CDN; form targets may not live there
    pub cdn_host: Option<String>,
    /// Origin of the document hosting forms, asserted by responses
    pub source_origin: Option<String>,
    /// Request timeout in seconds
    pub request_timeout_secs: Option<u64>,
}

impl Settings {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "ampproject", "amp-form")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut settings = Self::load_file()?;
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    fn load_file() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Read settings from `path`, or defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(origin) = var("AMP_FORM_SOURCE_ORIGIN") {
            self.source_origin = Some(origin);
        }
        if let Some(host) = var("AMP_FORM_CDN_HOST") {
            self.cdn_host = Some(host);
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Validation rules for form targets
    pub fn target_policy(&self) -> TargetPolicy {
        match self.cdn_host.as_deref() {
            Some(host) if !host.trim().is_empty() => TargetPolicy::new(host),
            Some(_) => {
                tracing::warn!("Ignoring empty cdn_host setting");
                TargetPolicy::default()
            }
            None => TargetPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.cdn_host.is_none());
        assert!(settings.source_origin.is_none());
        assert!(settings.request_timeout_secs.is_none());
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_serialization() {
        let settings = Settings {
            cdn_host: Some("cdn.example.net".to_string()),
            source_origin: Some("https://publisher.com".to_string()),
            request_timeout_secs: Some(5),
        };

        let json = serde_json::to_string(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, settings);
        assert_eq!(parsed.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Unknown fields are ignored
        let json = r#"{"cdn_host": "cdn.example.net", "unknown_field": "value"}"#;
        let parsed: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.cdn_host.as_deref(), Some("cdn.example.net"));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            ("AMP_FORM_SOURCE_ORIGIN", "https://override.com"),
            ("AMP_FORM_CDN_HOST", "cdn.override.com"),
        ]
        .into_iter()
        .collect();
        let mut settings = Settings {
            source_origin: Some("https://file.com".to_string()),
            ..Default::default()
        };
        settings.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(
            settings.source_origin.as_deref(),
            Some("https://override.com")
        );
        assert_eq!(settings.cdn_host.as_deref(), Some("cdn.override.com"));
    }

    #[test]
    fn test_env_absent_keeps_values() {
        let mut settings = Settings {
            cdn_host: Some("cdn.example.net".to_string()),
            ..Default::default()
        };
        settings.apply_env(|_| None);
        assert_eq!(settings.cdn_host.as_deref(), Some("cdn.example.net"));
    }

    #[test]
    fn test_target_policy_defaults_to_platform_cdn() {
        assert_eq!(
            Settings::default().target_policy().cdn_host(),
            "cdn.ampproject.org"
        );
        let blank = Settings {
            cdn_host: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.target_policy().cdn_host(), "cdn.ampproject.org");
    }

    #[test]
    fn test_target_policy_uses_configured_host() {
        let settings = Settings {
            cdn_host: Some("CDN.Example.NET".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.target_policy().cdn_host(), "cdn.example.net");
    }

    #[test]
    fn test_config_path_returns_option() {
        // Just test that the function doesn't panic
        let _path = Settings::config_path();
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("amp-form-settings-{}", std::process::id()));
        let path = dir.join("nested").join("config.json");
        let settings = Settings {
            cdn_host: Some("cdn.example.net".to_string()),
            source_origin: Some("https://publisher.example".to_string()),
            request_timeout_secs: Some(5),
        };

        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let path = std::env::temp_dir().join("amp-form-settings-missing").join("config.json");
        assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_load_from_rejects_malformed_file() {
        let dir = std::env::temp_dir().join(format!("amp-form-malformed-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let result = Settings::load_from(&path);
        fs::remove_dir_all(&dir).unwrap();

        assert!(result.is_err());
    }
}
