//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with a temporary config and ledger
//! - Command builder helpers for common patterns

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Default pool configuration: a /29 and a /30 pool.
pub const DEFAULT_CONFIG: &str = "\
pools:
  - name: rack-a
    cidr: 10.0.0.0/29
    gateway: 10.0.0.1
    dns: [1.1.1.1, 8.8.8.8]
    reserved: [10.0.0.1]
  - name: tiny
    cidr: 10.0.1.0/30
    gateway: 10.0.1.1
    dns: [1.1.1.1]
";

/// Test environment with an isolated configuration file and ledger.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the pool configuration file
    pub config_path: PathBuf,
    /// Path to the ledger file (not created until the first write)
    pub state_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment using [`DEFAULT_CONFIG`].
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CONFIG)
    }

    /// Create a new test environment with the given configuration text.
    pub fn with_config(config: &str) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let config_path = temp_path.join("ip-pools.yaml");
        let state_path = temp_path.join("state").join("assigned.json");
        std::fs::write(&config_path, config).expect("Failed to write config");

        Self {
            temp_dir,
            temp_path,
            config_path,
            state_path,
        }
    }

    /// Get a bare command builder without pre-configured flags.
    ///
    /// Environment variables that would leak the caller's settings into
    /// the test are cleared.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("ipam").expect("Failed to find ipam binary");
        for var in [
            "IPAM_CONFIG",
            "IPAM_STATE",
            "IPAM_POOL",
            "IPAM_LOCK_TIMEOUT",
            "IPAM_LOG_MODE",
            "IPAM_OUTPUT_FORMAT",
        ] {
            cmd.env_remove(var);
        }
        cmd.current_dir(&self.temp_path);
        cmd
    }

    /// Get a command builder with `--config` and `--state` pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--config")
            .arg(&self.config_path)
            .arg("--state")
            .arg(&self.state_path);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Write raw ledger contents.
    pub fn write_state(&self, contents: &str) {
        std::fs::create_dir_all(self.state_path.parent().unwrap()).unwrap();
        std::fs::write(&self.state_path, contents).expect("Failed to write ledger");
    }

    /// Read the ledger as JSON.
    pub fn read_state(&self) -> serde_json::Value {
        let text = std::fs::read_to_string(&self.state_path).expect("Failed to read ledger");
        serde_json::from_str(&text).expect("Ledger is not valid JSON")
    }

    /// Addresses recorded for `pool` in the ledger.
    pub fn assigned(&self, pool: &str) -> Vec<String> {
        let state = self.read_state();
        state["pools"][pool]["assigned_ips"]
            .as_array()
            .map(|ips| {
                ips.iter()
                    .map(|ip| ip.as_str().unwrap().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Run `ipam allocate` and return the parsed JSON output.
    ///
    /// # Panics
    /// Panics if the allocate command fails.
    pub fn allocate(&self, pool: Option<&str>) -> serde_json::Value {
        let mut cmd = self.command();
        if let Some(pool) = pool {
            cmd.arg("--pool").arg(pool);
        }
        let output = cmd.arg("allocate").output().expect("Failed to run allocate");

        assert!(
            output.status.success(),
            "Allocate failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        serde_json::from_slice(&output.stdout).expect("Output is not valid JSON")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
