//! Single-shot HTTP reachability probe.
//!
//! Issues one GET against the configured target and classifies the outcome.
//! A completed HTTP exchange is a valid observation regardless of status
//! code; only transport-level failures (connect, DNS, TLS, timeout) count as
//! probe failures. No retry happens at this layer; probing is fire-once per
//! cycle.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tokio::time::timeout;

use crate::config::AgentConfig;

/// Errors raised by a probe attempt.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The request did not complete within the configured timeout.
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),

    /// Transport-level failure reaching the target.
    #[error("probe transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// One completed reachability measurement.
///
/// Only constructed when the probe received an HTTP response, and never
/// mutated afterwards: it is either delivered or discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    /// The probed target.
    pub url: String,
    /// HTTP status code of the probe response.
    pub status: u16,
    /// Wall-clock duration of the probe request, in milliseconds.
    #[serde(rename = "latency")]
    pub latency_ms: u64,
    /// UTC instant at which the probe completed.
    pub timestamp: DateTime<Utc>,
}

/// Issues probes against the configured target.
#[derive(Debug, Clone)]
pub struct Prober {
    target_url: String,
    timeout: Duration,
    client: Client,
}

impl Prober {
    /// Create a prober for the configured target.
    ///
    /// Redirects are followed with the client's default policy.
    ///
    /// # Errors
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn new(config: &AgentConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            target_url: config.target_url.clone(),
            timeout: config.timeout,
            client,
        })
    }

    /// Perform one probe.
    ///
    /// Any HTTP response, including 4xx/5xx, yields an [`Observation`]; the
    /// status code is data, not an error.
    ///
    /// # Errors
    /// Returns [`ProbeError`] when no HTTP exchange completed.
    pub async fn probe(&self) -> Result<Observation, ProbeError> {
        let start = Instant::now();
        let result = timeout(self.timeout, self.client.get(&self.target_url).send()).await;
        let elapsed = start.elapsed();

        let response = match result {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::warn!(url = %self.target_url, error = %e, "Probe failed");
                return Err(ProbeError::Transport(e));
            }
            Err(_) => {
                tracing::warn!(
                    url = %self.target_url,
                    timeout_ms = self.timeout.as_millis(),
                    "Probe timed out"
                );
                return Err(ProbeError::Timeout(self.timeout));
            }
        };

        let observation = Observation {
            url: self.target_url.clone(),
            status: response.status().as_u16(),
            latency_ms: elapsed.as_millis().min(u64::MAX as u128) as u64,
            timestamp: Utc::now(),
        };

        tracing::info!(
            url = %observation.url,
            status = observation.status,
            latency_ms = observation.latency_ms,
            "Probe completed"
        );

        Ok(observation)
    }
}
