//! List command implementation.
//!
//! This module implements the `list` command, which displays pool usage
//! and assigned addresses as text or JSON.

use std::io::Write;

use clap::{Args, ValueEnum};
use ipam::{status, PoolStatus};

use crate::error::CliError;
use crate::utils::{load_configuration, open_session, select_pool, GlobalOptions};

/// Show pool usage and assigned addresses.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "text",
        env = "IPAM_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: OutputFormat,
}

/// Output format for list command.
#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One block per pool, for people
    Text,
    /// A JSON array of pool summaries
    Json,
}

impl ListCommand {
    /// Execute the list command.
    ///
    /// With `--pool` only that pool is shown; otherwise every configured
    /// pool is.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let pools = match global.pool {
            Some(_) => vec![select_pool(global, &config)?],
            None => config.pools.clone(),
        };

        let session = open_session(global, &config)?;
        let statuses = pools
            .iter()
            .map(|pool| status(session.ledger(), pool))
            .collect::<Result<Vec<_>, _>>()?;
        session.close()?;

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut out, &statuses)?;
                writeln!(out)?;
            }
            OutputFormat::Text => write_text(&mut out, &statuses)?,
        }

        Ok(())
    }
}

fn write_text(out: &mut impl Write, statuses: &[PoolStatus]) -> std::io::Result<()> {
    for status in statuses {
        let usage = &status.usage;
        writeln!(
            out,
            "{} ({}): {} assigned, {} reserved, {} free of {} hosts",
            status.pool, status.cidr, usage.assigned, usage.reserved, usage.free, usage.hosts
        )?;
        for address in &status.assigned {
            writeln!(out, "  {address}")?;
        }
    }
    Ok(())
}
