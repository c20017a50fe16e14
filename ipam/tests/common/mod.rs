//! Common test utilities for integration tests.

use std::path::PathBuf;

use ipam::{LedgerConfig, Pool};
use tempfile::TempDir;

/// A temporary directory holding one ledger file.
///
/// The directory is removed when the fixture is dropped.
pub struct LedgerFixture {
    dir: TempDir,
}

#[allow(dead_code)]
impl LedgerFixture {
    /// Creates an empty fixture; the ledger file does not exist yet.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Path of the ledger file.
    pub fn path(&self) -> PathBuf {
        self.dir.path().join("assigned.json")
    }

    /// Session settings that block on the lock.
    pub fn config(&self) -> LedgerConfig {
        LedgerConfig::new(self.path())
    }

    /// Writes raw contents to the ledger file.
    pub fn write(&self, contents: &str) {
        std::fs::write(self.path(), contents).unwrap();
    }

    /// Reads the ledger file as text.
    pub fn read(&self) -> String {
        std::fs::read_to_string(self.path()).unwrap()
    }
}

/// The `/29` pool used across scenarios: hosts .1 to .6, with .1 reserved.
#[allow(dead_code)]
pub fn rack_a() -> Pool {
    Pool::new("rack-a", "10.0.0.0/29")
        .with_gateway("10.0.0.1")
        .with_dns(["1.1.1.1", "8.8.8.8"])
        .with_reserved(["10.0.0.1"])
}

/// A `/24` pool with only the gateway reserved.
#[allow(dead_code)]
pub fn wide_pool(name: &str) -> Pool {
    Pool::new(name, "10.1.0.0/24")
        .with_gateway("10.1.0.1")
        .with_reserved(["10.1.0.1"])
}
