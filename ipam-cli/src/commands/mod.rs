//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `allocate`: Allocate the next free address of a pool
//! - `release`: Release an allocated address
//! - `cloud_init`: Allocate and print a cloud-init network config
//! - `validate`: Probe a host and write a delivery report
//! - `list`: Show pool usage and assigned addresses
//! - `check_config`: Validate the configuration file
//! - `completions`: Generate shell completion scripts

pub mod allocate;
pub mod check_config;
pub mod cloud_init;
pub mod completions;
pub mod list;
pub mod release;
pub mod validate;

pub use allocate::AllocateCommand;
pub use check_config::CheckConfigCommand;
pub use cloud_init::CloudInitCommand;
pub use completions::CompletionsCommand;
pub use list::ListCommand;
pub use release::ReleaseCommand;
pub use validate::ValidateCommand;
