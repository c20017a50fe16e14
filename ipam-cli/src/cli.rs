//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{
    AllocateCommand, CheckConfigCommand, CloudInitCommand, CompletionsCommand, ListCommand,
    ReleaseCommand, ValidateCommand,
};

/// Command-line tool for allocating IPv4 addresses from static pools.
#[derive(Debug, Parser)]
#[command(name = "ipam")]
#[command(version, about = "Allocate and release IPv4 addresses from static pools", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to the pool configuration file
    #[arg(
        long,
        value_name = "PATH",
        global = true,
        env = "IPAM_CONFIG",
        default_value = ipam::config::DEFAULT_CONFIG_PATH
    )]
    pub config: PathBuf,

    /// Override the ledger file location
    #[arg(long, value_name = "PATH", global = true, env = "IPAM_STATE")]
    pub state: Option<PathBuf>,

    /// Pool to operate on (default: the first configured pool)
    #[arg(long, value_name = "NAME", global = true, env = "IPAM_POOL")]
    pub pool: Option<String>,

    /// Give up waiting for the ledger lock after this many seconds
    #[arg(long, value_name = "SECONDS", global = true, env = "IPAM_LOCK_TIMEOUT")]
    pub lock_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Allocate the next free address and print it as JSON
    Allocate(AllocateCommand),

    /// Release a previously allocated address
    Release(ReleaseCommand),

    /// Allocate an address and print a cloud-init network config for it
    CloudInit(CloudInitCommand),

    /// Check that a host is reachable and write a delivery report
    Validate(ValidateCommand),

    /// Show pool usage and assigned addresses
    List(ListCommand),

    /// Load and validate the configuration file
    CheckConfig(CheckConfigCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
