//! One probe-and-deliver iteration.
//!
//! Composes the prober and transmitter and contains every failure inside the
//! cycle boundary: probe and delivery failures end as log records, so a bad
//! cycle cannot take the scheduler down with it. No state survives from one
//! cycle to the next.

use std::time::Instant;

use crate::config::AgentConfig;
use crate::deliver::Transmitter;
use crate::probe::Prober;

/// Terminal outcome of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Observation delivered to the collector.
    Delivered,
    /// All delivery attempts exhausted; observation dropped.
    DeliveryFailed,
    /// Probe failed at the transport level; nothing to deliver.
    ProbeFailed,
}

/// Runs probe-then-deliver iterations.
#[derive(Debug, Clone)]
pub struct CycleRunner {
    prober: Prober,
    transmitter: Transmitter,
}

impl CycleRunner {
    /// Build a runner from configuration.
    ///
    /// # Errors
    /// Returns `reqwest::Error` if either HTTP client cannot be built.
    pub fn new(config: &AgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            prober: Prober::new(config)?,
            transmitter: Transmitter::new(config)?,
        })
    }

    /// Assemble a runner from already-built components.
    pub fn from_parts(prober: Prober, transmitter: Transmitter) -> Self {
        Self {
            prober,
            transmitter,
        }
    }

    /// Execute one cycle and record the outcome.
    ///
    /// Never propagates an error: a failed probe ends the cycle with nothing
    /// to deliver, and an exhausted delivery ends it with the observation
    /// dropped.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let start = Instant::now();
        tracing::info!("Cycle started");

        let outcome = match self.prober.probe().await {
            Ok(observation) => match self.transmitter.deliver(&observation).await {
                Ok(()) => CycleOutcome::Delivered,
                Err(e) => {
                    tracing::error!(error = %e, "Cycle ended with undelivered observation");
                    CycleOutcome::DeliveryFailed
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "Probe failed, skipping delivery");
                CycleOutcome::ProbeFailed
            }
        };

        let duration_ms = start.elapsed().as_millis();
        tracing::info!(?outcome, duration_ms, "Cycle complete");
        outcome
    }
}
