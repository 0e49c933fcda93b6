//! Pharos binary entry point.
//!
//! Reads configuration from the environment (or CLI flags), then runs the
//! probe scheduler until interrupted. Core functionality is provided by the
//! `pharos` library crate.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pharos::{config::AgentConfig, logging, scheduler};

/// Pharos - URL monitoring agent.
#[derive(Parser, Debug)]
#[command(name = "pharos", version, about, long_about = None)]
struct Cli {
    /// Target URL to probe.
    #[arg(long, env = "TARGET_URL")]
    target_url: Option<String>,

    /// Collector base URL observations are delivered to.
    #[arg(long, env = "BACKEND_URL")]
    backend_url: Option<String>,

    /// API key sent with every delivery request.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Seconds between probe cycles.
    #[arg(long, env = "AGENT_INTERVAL")]
    interval: Option<u64>,

    /// Directory for rolling log files (console-only when unset).
    #[arg(long, env = "LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Pick up a local .env before reading configuration.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let _guard = match logging::init(cli.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = match AgentConfig::from_settings(
        cli.target_url,
        cli.backend_url,
        cli.api_key,
        cli.interval,
    ) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Configuration invalid, refusing to start");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        target_url = %config.target_url,
        backend_url = %config.backend_url,
        interval_secs = config.interval.as_secs(),
        "Agent initialized"
    );

    match scheduler::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Agent terminated on fatal error");
            ExitCode::FAILURE
        }
    }
}
