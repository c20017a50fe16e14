//! Command to validate the pool configuration file.

use clap::Args;
use ipam::config::ConfigValidator;

use crate::error::CliError;
use crate::utils::{load_configuration, GlobalOptions};

/// Load and validate the configuration file.
#[derive(Debug, Args)]
pub struct CheckConfigCommand {}

impl CheckConfigCommand {
    /// Execute the check-config command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        ConfigValidator::validate(&config)?;

        if !global.quiet {
            eprintln!(
                "{}: {} pool(s) OK",
                global.config.display(),
                config.pools.len()
            );
        }
        println!("Configuration is valid");
        Ok(())
    }
}
