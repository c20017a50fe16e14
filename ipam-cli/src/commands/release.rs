//! Release command implementation.
//!
//! This module implements the `release` command, which returns an address
//! to the selected pool.

use clap::Args;

use crate::error::CliError;
use crate::utils::{load_configuration, open_session, select_pool, GlobalOptions};

/// Release a previously allocated address.
#[derive(Debug, Args)]
pub struct ReleaseCommand {
    /// Address to release
    #[arg(value_name = "IP")]
    pub ip: String,
}

impl ReleaseCommand {
    /// Execute the release command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let pool = select_pool(global, &config)?;

        let mut session = open_session(global, &config)?;
        let released = ipam::release(&mut session, &pool, &self.ip)?;
        session.close()?;

        if !global.quiet {
            eprintln!("Released {released} from pool '{}'", pool.name);
        }

        Ok(())
    }
}
