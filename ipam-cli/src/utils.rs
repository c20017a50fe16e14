//! Utility functions for CLI operations.
//!
//! This module provides helpers shared across commands: loading the pool
//! configuration, selecting a pool and opening the ledger with the
//! resolved path and lock timeout.

use std::path::PathBuf;
use std::time::Duration;

use ipam::config::{Config, ConfigLoader, ConfigValidator, Pool};
use ipam::ledger::{default_ledger_path, LedgerConfig, LedgerSession};

use crate::error::CliError;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Suppress non-essential output.
    pub quiet: bool,

    /// Path to the pool configuration file.
    pub config: PathBuf,

    /// Override the ledger file location.
    pub state: Option<PathBuf>,

    /// Pool to operate on (default: the first configured pool).
    pub pool: Option<String>,

    /// Override the lock wait (in seconds).
    pub lock_timeout: Option<u64>,
}

/// Load the pool configuration named by the global options.
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    Ok(ConfigLoader::load(&global.config)?)
}

/// Select the pool named by `--pool`, or the first pool, and validate it.
pub fn select_pool(global: &GlobalOptions, config: &Config) -> Result<Pool, CliError> {
    let pool = config.pool(global.pool.as_deref())?;
    ConfigValidator::validate_pool(pool)?;
    Ok(pool.clone())
}

/// Resolve the ledger path.
///
/// Priority: `--state` / `IPAM_STATE`, then `state_file` from the
/// configuration, then `~/.ipam/assigned.json`.
pub fn resolve_ledger_path(global: &GlobalOptions, config: &Config) -> Result<PathBuf, CliError> {
    if let Some(ref state) = global.state {
        return Ok(state.clone());
    }
    if let Some(ref state_file) = config.state_file {
        return Ok(state_file.clone());
    }
    Ok(default_ledger_path()?)
}

/// Resolve how long to wait for the ledger lock; `None` waits indefinitely.
fn resolve_lock_timeout(global: &GlobalOptions, config: &Config) -> Option<Duration> {
    global
        .lock_timeout
        .map(Duration::from_secs)
        .or_else(|| config.lock_timeout())
}

/// Open the ledger session for this invocation.
pub fn open_session(global: &GlobalOptions, config: &Config) -> Result<LedgerSession, CliError> {
    let mut ledger_config = LedgerConfig::new(resolve_ledger_path(global, config)?);
    if let Some(timeout) = resolve_lock_timeout(global, config) {
        ledger_config = ledger_config.with_lock_timeout(timeout);
    }
    Ok(LedgerSession::open(ledger_config)?)
}
