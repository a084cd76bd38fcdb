//! Logging setup using tracing
//!
//! Log lines go to stderr so the run summary on stdout stays machine readable.
//! `RUST_LOG` overrides the default filter, e.g. `RUST_LOG=jira_backend=debug`.

use std::io::IsTerminal;

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Progress from the migration crates, warnings only from dependencies
const DEFAULT_FILTER: &str = "warn,jira2gh=info,migrate_core=info,jira_backend=info,github_backend=info";

pub fn init() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}
