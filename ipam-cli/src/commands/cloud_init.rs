//! Cloud-init command implementation.
//!
//! Allocates like `allocate`, then prints a cloud-init network config for
//! the new address instead of JSON.

use clap::Args;
use ipam::render::{cloud_init_network, NetworkConfig, DEFAULT_INTERFACE};

use crate::error::CliError;
use crate::utils::{load_configuration, open_session, select_pool, GlobalOptions};

/// Allocate an address and print a cloud-init network config for it.
#[derive(Debug, Args)]
pub struct CloudInitCommand {
    /// Interface to configure
    #[arg(long, value_name = "NAME", default_value = DEFAULT_INTERFACE)]
    pub interface: String,
}

impl CloudInitCommand {
    /// Execute the cloud-init command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if self.interface.trim().is_empty() {
            return Err(CliError::InvalidArguments(
                "--interface cannot be empty".to_string(),
            ));
        }

        let config = load_configuration(global)?;
        let pool = select_pool(global, &config)?;

        let mut session = open_session(global, &config)?;
        let allocation = ipam::allocate(&mut session, &pool)?;
        session.close()?;

        let network = NetworkConfig::from_allocation(&allocation, self.interface);
        print!("{}", cloud_init_network(&network));

        Ok(())
    }
}
