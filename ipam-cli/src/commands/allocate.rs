//! Allocate command implementation.
//!
//! This module implements the `allocate` command, which records the next
//! free address of the selected pool and prints it as JSON.

use clap::Args;

use crate::error::CliError;
use crate::utils::{load_configuration, open_session, select_pool, GlobalOptions};

/// Allocate the next free address of a pool.
#[derive(Debug, Args)]
pub struct AllocateCommand {}

impl AllocateCommand {
    /// Execute the allocate command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // 1. Load configuration and pick the pool
        let config = load_configuration(global)?;
        let pool = select_pool(global, &config)?;

        // 2. Allocate under the ledger lock
        let mut session = open_session(global, &config)?;
        let allocation = ipam::allocate(&mut session, &pool)?;
        session.close()?;

        // 3. Output the allocation
        println!("{}", serde_json::to_string(&allocation)?);

        if !global.quiet {
            eprintln!("Allocated {} from pool '{}'", allocation.ip, allocation.pool);
        }

        Ok(())
    }
}
