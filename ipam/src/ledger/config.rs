//! Where the ledger lives and how long to wait for it.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Name of the per-user data directory under the home directory.
const DATA_DIR_NAME: &str = ".ipam";

/// File name of the default ledger inside the data directory.
const LEDGER_FILE_NAME: &str = "assigned.json";

/// Settings for opening a [`LedgerSession`](super::LedgerSession).
///
/// # Examples
///
/// ```
/// use ipam::ledger::LedgerConfig;
/// use std::time::Duration;
///
/// let config = LedgerConfig::new("/var/lib/ipam/assigned.json")
///     .with_lock_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.lock_timeout, Some(Duration::from_secs(5)));
/// assert!(config.lock_path().ends_with("assigned.json.lock"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Path of the ledger file.
    pub path: PathBuf,

    /// How long to wait for the lock. `None` waits indefinitely.
    pub lock_timeout: Option<Duration>,
}

impl LedgerConfig {
    /// Ledger at `path`, waiting indefinitely for the lock.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout: None,
        }
    }

    /// Give up waiting for the lock after `timeout`.
    #[must_use]
    pub const fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = Some(timeout);
        self
    }

    /// The sidecar file the advisory lock is taken on.
    #[must_use]
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from(LEDGER_FILE_NAME), OsString::from);
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Directory holding the ledger, used for temporary files on persist.
    pub(super) fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

/// The per-user data directory, `~/.ipam`.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the home directory cannot be determined.
pub fn default_data_dir() -> Result<PathBuf> {
    home::home_dir()
        .map(|home| home.join(DATA_DIR_NAME))
        .ok_or_else(|| Error::Validation {
            field: "state".into(),
            message: "Cannot determine home directory; pass --state explicitly".into(),
        })
}

/// The default ledger path, `~/.ipam/assigned.json`.
///
/// # Errors
///
/// Same as [`default_data_dir`].
pub fn default_ledger_path() -> Result<PathBuf> {
    Ok(default_data_dir()?.join(LEDGER_FILE_NAME))
}
