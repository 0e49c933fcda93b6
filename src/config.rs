//! Agent configuration.
//!
//! Configuration is read once at startup (environment variables, optionally
//! overridden by CLI flags) and held immutable for the lifetime of the
//! process. Components receive it by reference; nothing reads the
//! environment after startup.

use std::time::Duration;

use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Default collector base URL.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Default probe interval (60 seconds).
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Minimum allowed probe interval (1 second).
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Timeout applied to every outbound HTTP request (10 seconds).
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Total delivery attempts per observation.
pub const MAX_DELIVERY_ATTEMPTS: u32 = 3;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting is absent.
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    /// A setting has an unusable value.
    #[error("config validation error: {0}")]
    Invalid(String),
}

/// Process-wide agent configuration.
///
/// Constructed at startup, never reloaded.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Target URL to probe.
    pub target_url: String,
    /// Collector base URL observations are delivered to.
    pub backend_url: String,
    /// Credential sent with every delivery request.
    pub api_key: String,
    /// Pause between the end of one cycle and the start of the next.
    pub interval: Duration,
    /// Per-request timeout for probe and delivery calls.
    pub timeout: Duration,
    /// Total delivery attempts before an observation is dropped.
    pub max_attempts: u32,
}

impl AgentConfig {
    /// Build a configuration from raw startup settings.
    ///
    /// Absent optional settings fall back to defaults; an interval below the
    /// 1s minimum is clamped with a warning.
    ///
    /// # Errors
    /// Returns `ConfigError::Missing` if the target URL or API key is absent
    /// or blank, `ConfigError::Invalid` if a URL is not http(s).
    pub fn from_settings(
        target_url: Option<String>,
        backend_url: Option<String>,
        api_key: Option<String>,
        interval_secs: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let target_url = target_url
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("TARGET_URL"))?;
        let api_key = api_key
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("API_KEY"))?;
        let backend_url = backend_url
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        validate_url("TARGET_URL", &target_url)?;
        validate_url("BACKEND_URL", &backend_url)?;

        let interval = match interval_secs {
            Some(secs) => {
                let requested = Duration::from_secs(secs);
                if requested < MIN_INTERVAL {
                    tracing::warn!(
                        min_interval = ?MIN_INTERVAL,
                        "Probe interval is less than minimum allowed. Using minimum interval."
                    );
                    MIN_INTERVAL
                } else {
                    requested
                }
            }
            None => DEFAULT_INTERVAL,
        };

        Ok(Self {
            target_url,
            backend_url: backend_url.trim_end_matches('/').to_string(),
            api_key,
            interval,
            timeout: REQUEST_TIMEOUT,
            max_attempts: MAX_DELIVERY_ATTEMPTS,
        })
    }

    /// Collector endpoint observations are POSTed to.
    pub fn events_endpoint(&self) -> String {
        format!("{}/events", self.backend_url)
    }
}

fn validate_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be an http(s) URL, got '{}'",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> (Option<String>, Option<String>, Option<String>, Option<u64>) {
        (
            Some("https://example.com".to_string()),
            Some("http://collector:8080".to_string()),
            Some("secret".to_string()),
            Some(30),
        )
    }

    #[test]
    fn test_full_settings() {
        let (target, backend, key, interval) = settings();
        let config = AgentConfig::from_settings(target, backend, key, interval).unwrap();

        assert_eq!(config.target_url, "https://example.com");
        assert_eq!(config.backend_url, "http://collector:8080");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.interval, Duration::from_secs(30));
        assert_eq!(config.timeout, REQUEST_TIMEOUT);
        assert_eq!(config.max_attempts, MAX_DELIVERY_ATTEMPTS);
    }

    #[test]
    fn test_defaults_applied() {
        let (target, _, key, _) = settings();
        let config = AgentConfig::from_settings(target, None, key, None).unwrap();

        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.interval, DEFAULT_INTERVAL);
    }

    #[test]
    fn test_missing_target_url() {
        let (_, backend, key, interval) = settings();
        let result = AgentConfig::from_settings(None, backend, key, interval);

        assert!(matches!(result, Err(ConfigError::Missing("TARGET_URL"))));
    }

    #[test]
    fn test_blank_target_url() {
        let (_, backend, key, interval) = settings();
        let result = AgentConfig::from_settings(Some("  ".to_string()), backend, key, interval);

        assert!(matches!(result, Err(ConfigError::Missing("TARGET_URL"))));
    }

    #[test]
    fn test_missing_api_key() {
        let (target, backend, _, interval) = settings();
        let result = AgentConfig::from_settings(target, backend, None, interval);

        assert!(matches!(result, Err(ConfigError::Missing("API_KEY"))));
    }

    #[test]
    fn test_non_http_url_rejected() {
        let (_, backend, key, interval) = settings();
        let result =
            AgentConfig::from_settings(Some("ftp://example.com".to_string()), backend, key, interval);

        let err = result.unwrap_err();
        assert!(err.to_string().contains("TARGET_URL"));
    }

    #[test]
    fn test_interval_clamped_to_minimum() {
        let (target, backend, key, _) = settings();
        let config = AgentConfig::from_settings(target, backend, key, Some(0)).unwrap();

        assert_eq!(config.interval, MIN_INTERVAL);
    }

    #[test]
    fn test_events_endpoint_normalizes_trailing_slash() {
        let (target, _, key, interval) = settings();
        let config = AgentConfig::from_settings(
            target,
            Some("http://collector:8080/".to_string()),
            key,
            interval,
        )
        .unwrap();

        assert_eq!(config.events_endpoint(), "http://collector:8080/events");
    }
}
