//! Main entry point for the ipam CLI.
//!
//! This is the command-line interface for the ipam address allocator.
//! It provides commands for managing pool assignments:
//! - `allocate`: Hand out the next free address of a pool
//! - `release`: Return an address to its pool
//! - `cloud-init`: Allocate and render a cloud-init network config
//! - `validate`: Probe a host and record a delivery report
//! - `list`: Show pool usage

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use error::CliError;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments; usage errors exit with the invalid-arguments code
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(CliError::from(e).exit_code());
        }
    };

    // Initialize logging based on verbosity
    let _logger = ipam::init_logger(cli.verbose, cli.quiet);

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        quiet: cli.quiet,
        config: cli.config,
        state: cli.state,
        pool: cli.pool,
        lock_timeout: cli.lock_timeout,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Allocate(cmd) => cmd.execute(&global),
        cli::Command::Release(cmd) => cmd.execute(&global),
        cli::Command::CloudInit(cmd) => cmd.execute(&global),
        cli::Command::Validate(cmd) => cmd.execute(&global),
        cli::Command::List(cmd) => cmd.execute(&global),
        cli::Command::CheckConfig(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
