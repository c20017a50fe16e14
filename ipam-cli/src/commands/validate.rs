//! Validate command implementation.
//!
//! This module implements the `validate` command, which checks that a
//! provisioned host accepts connections and, if so, records a READY
//! delivery report for it.

use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use ipam::pool::parse_address;
use ipam::probe::{ReachabilityProbe, TcpProbe, DEFAULT_PORT, DEFAULT_TIMEOUT};
use ipam::report::{DeliveryReport, DEFAULT_REPORTS_DIR};

use crate::error::CliError;
use crate::utils::GlobalOptions;

/// Check that a host is reachable and write a delivery report.
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Address of the host to check
    #[arg(value_name = "IP")]
    pub ip: String,

    /// TCP port to connect to
    #[arg(long, value_name = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Connection timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Directory to write the report into
    #[arg(long, value_name = "PATH", default_value = DEFAULT_REPORTS_DIR)]
    pub reports_dir: PathBuf,
}

impl ValidateCommand {
    /// Execute the validate command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if self.timeout == 0 {
            return Err(CliError::InvalidArguments(
                "--timeout must be greater than 0".to_string(),
            ));
        }

        let address = parse_address(&self.ip)?;
        let probe = TcpProbe::new(self.port, Duration::from_secs(self.timeout));
        Self::run(&probe, address, &self.reports_dir, global)
    }

    fn run(
        probe: &dyn ReachabilityProbe,
        address: Ipv4Addr,
        reports_dir: &Path,
        global: &GlobalOptions,
    ) -> Result<(), CliError> {
        if !probe.is_reachable(address) {
            return Err(CliError::SemanticFailure(format!(
                "validation failed for {address}: host is not reachable"
            )));
        }

        let path = DeliveryReport::new(address).write_to_dir(reports_dir)?;

        if !global.quiet {
            eprintln!("{address} is READY; report written to {}", path.display());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipam::probe::StaticProbe;

    fn global() -> GlobalOptions {
        GlobalOptions {
            quiet: true,
            config: PathBuf::from("unused.yaml"),
            state: None,
            pool: None,
            lock_timeout: None,
        }
    }

    #[test]
    fn test_unreachable_host_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let reports = dir.path().join("reports");

        let err = ValidateCommand::run(
            &StaticProbe::default(),
            Ipv4Addr::new(10, 0, 0, 2),
            &reports,
            &global(),
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(!reports.exists());
    }

    #[test]
    fn test_reachable_host_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let reports = dir.path().join("reports");
        let address = Ipv4Addr::new(10, 0, 0, 2);

        ValidateCommand::run(&StaticProbe::new([address]), address, &reports, &global()).unwrap();
        assert!(reports.join("10.0.0.2.json").exists());
    }
}
