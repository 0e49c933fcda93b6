//! Pharos - URL Monitoring Agent
//!
//! This crate provides the core functionality for the Pharos monitoring
//! agent: an edge data-collection client that periodically probes a single
//! target URL and forwards each observation to a remote collector over HTTP,
//! retrying failed deliveries with bounded exponential backoff.
//!
//! # Architecture
//!
//! - [`probe`]: single-shot HTTP reachability and latency probe
//! - [`deliver`]: observation delivery with bounded backoff retry
//! - [`cycle`]: one probe-and-deliver iteration with failure containment
//! - [`scheduler`]: fixed-interval loop driven until an interrupt signal
//! - [`config`]: process-wide immutable configuration
//!
//! Failures below the cycle boundary never interrupt the scheduling cadence;
//! only configuration errors (before the loop) and contract-violating faults
//! (inside the loop) terminate the process.

pub mod config;
pub mod cycle;
pub mod deliver;
pub mod logging;
pub mod probe;
pub mod scheduler;

pub use config::{AgentConfig, ConfigError};
pub use cycle::{CycleOutcome, CycleRunner};
pub use deliver::{DeliveryError, Transmitter};
pub use probe::{Observation, ProbeError, Prober};
pub use scheduler::FatalError;
