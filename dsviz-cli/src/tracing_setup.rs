//! Tracing setup for the dsviz CLI
//!
//! Usage:
//!   dsviz --debug ...              # Debug logging
//!   RUST_LOG=dsviz_core=debug dsviz # Fine-grained log control
//!
//! The TUI owns stdout, so `play` logs to ~/.dsviz/dsviz.log instead of
//! the console. Every other command logs to stderr.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets RUST_LOG=debug if not already set)
    pub debug: bool,
    /// Append logs to this file instead of stderr
    pub log_file: Option<PathBuf>,
}

fn env_filter(config: &TracingConfig) -> EnvFilter {
    if config.debug {
        // Debug mode: set debug level unless RUST_LOG is explicitly set
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialize tracing based on configuration
pub fn init(config: &TracingConfig) -> Result<()> {
    let filter = env_filter(config);

    match &config.log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(config.debug)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .compact()
                .try_init()
                .map_err(|err| anyhow!(err))
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(config.debug) // Show targets in debug mode
            .with_writer(std::io::stderr)
            .compact()
            .try_init()
            .map_err(|err| anyhow!(err)),
    }
}
