//! Observation delivery with bounded retry.
//!
//! Serializes an observation and POSTs it to the collector's `/events`
//! endpoint. Delivery succeeds only on HTTP 201; any other status and any
//! transport error count as a failed attempt. Attempts are separated by an
//! exponential backoff and capped at a fixed total; an observation that
//! exhausts its attempts is dropped, not queued for a later cycle.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::config::AgentConfig;
use crate::probe::Observation;

/// Header carrying the collector credential.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Backoff before the retry following attempt `attempt` (1-based).
///
/// Grows as `2^attempt` seconds: 2s after the first attempt, 4s after the
/// second. Pure, so the schedule is testable without elapsed time.
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt))
}

/// Terminal delivery failure after all attempts are exhausted.
#[derive(Debug, Error)]
#[error("delivery failed after {attempts} attempts")]
pub struct DeliveryError {
    /// Number of attempts performed.
    pub attempts: u32,
}

/// Failure of a single delivery attempt.
#[derive(Debug, Error)]
enum AttemptError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("collector returned {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

/// Delivers observations to the collector endpoint.
#[derive(Clone)]
pub struct Transmitter {
    endpoint: String,
    api_key: String,
    max_attempts: u32,
    backoff: fn(u32) -> Duration,
    client: Client,
}

impl Transmitter {
    /// Create a transmitter for the configured collector.
    ///
    /// # Errors
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn new(config: &AgentConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            endpoint: config.events_endpoint(),
            api_key: config.api_key.clone(),
            max_attempts: config.max_attempts,
            backoff: backoff_delay,
            client,
        })
    }

    /// Replace the backoff schedule.
    ///
    /// The default is [`backoff_delay`]; tests substitute a millisecond-scale
    /// schedule so retry sequences run without real waits.
    pub fn with_backoff(mut self, backoff: fn(u32) -> Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Attempt delivery of one observation.
    ///
    /// Blocks the calling cycle for the whole retry sequence; no retry state
    /// outlives this call. Returns as soon as any attempt yields a 201.
    ///
    /// # Errors
    /// Returns [`DeliveryError`] once all attempts are exhausted without a
    /// 201 response.
    pub async fn deliver(&self, observation: &Observation) -> Result<(), DeliveryError> {
        for attempt in 1..=self.max_attempts {
            match self.try_send(observation).await {
                Ok(()) => {
                    tracing::info!(
                        url = %observation.url,
                        status = observation.status,
                        latency_ms = observation.latency_ms,
                        attempt,
                        "Delivery succeeded"
                    );
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Delivery attempt failed"
                    );
                }
            }

            // The final attempt is not followed by a sleep.
            if attempt < self.max_attempts {
                let delay = (self.backoff)(attempt);
                tracing::info!(delay_ms = delay.as_millis(), "Retrying after backoff");
                tokio::time::sleep(delay).await;
            }
        }

        tracing::error!(
            url = %observation.url,
            max_attempts = self.max_attempts,
            "Delivery failed, observation dropped"
        );

        Err(DeliveryError {
            attempts: self.max_attempts,
        })
    }

    async fn try_send(&self, observation: &Observation) -> Result<(), AttemptError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(observation)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::CREATED {
            return Ok(());
        }

        // Logged for diagnosis, never parsed.
        let body = response.text().await.unwrap_or_default();
        Err(AttemptError::Rejected { status, body })
    }
}

impl std::fmt::Debug for Transmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transmitter")
            .field("endpoint", &self.endpoint)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_schedule() {
        assert_eq!(backoff_delay(1), Duration::from_secs(2));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
        assert_eq!(backoff_delay(3), Duration::from_secs(8));
    }

    #[test]
    fn test_debug_withholds_credential() {
        // The credential must not leak through debug formatting.
        let config = crate::config::AgentConfig::from_settings(
            Some("https://example.com".to_string()),
            None,
            Some("super-secret".to_string()),
            None,
        )
        .unwrap();
        let transmitter = Transmitter::new(&config).unwrap();

        let rendered = format!("{:?}", transmitter);
        assert!(rendered.contains("endpoint"));
        assert!(!rendered.contains("super-secret"));
    }
}
