//! Exclusive read-modify-write access to the ledger file.

use std::fs;
#[cfg(unix)]
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::ledger::codec::{self, Ledger};
use crate::ledger::config::LedgerConfig;
use crate::ledger::lock::LedgerLock;

/// Prefix of the temporary file written next to the ledger on persist.
const TEMP_PREFIX: &str = ".ipam-ledger";

/// An open ledger, holding the exclusive lock for its whole lifetime.
///
/// Opening acquires the lock and reads the current contents; nothing another
/// process does can change the ledger until the session is closed or
/// dropped. Changes made through [`LedgerSession::ledger_mut`] are only
/// durable once [`LedgerSession::persist`] returns `Ok`.
///
/// # Examples
///
/// ```
/// use ipam::ledger::{LedgerConfig, LedgerSession};
/// use std::net::Ipv4Addr;
///
/// let dir = tempfile::tempdir().unwrap();
/// let config = LedgerConfig::new(dir.path().join("assigned.json"));
///
/// let mut session = LedgerSession::open(config.clone()).unwrap();
/// session.ledger_mut().push("rack-a", Ipv4Addr::new(10, 0, 0, 2));
/// session.persist().unwrap();
/// session.close().unwrap();
///
/// let session = LedgerSession::open(config).unwrap();
/// assert_eq!(session.ledger().assigned("rack-a").len(), 1);
/// ```
#[derive(Debug)]
pub struct LedgerSession {
    config: LedgerConfig,
    ledger: Ledger,
    lock: LedgerLock,
}

impl LedgerSession {
    /// Lock the ledger and load its contents.
    ///
    /// A missing or empty ledger file loads as an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockUnavailable`] if the lock timeout elapses,
    /// [`Error::CorruptLedger`] if the file cannot be decoded, or
    /// [`Error::Io`] if it cannot be read.
    pub fn open(config: LedgerConfig) -> Result<Self> {
        let lock = LedgerLock::acquire(&config.lock_path(), config.lock_timeout)?;
        let ledger = Self::read(&config.path)?;

        log::debug!(
            "opened ledger {} with {} recorded address(es)",
            config.path.display(),
            ledger.len()
        );
        Ok(Self {
            config,
            ledger,
            lock,
        })
    }

    fn read(path: &Path) -> Result<Ledger> {
        let contents = match fs::read(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Ledger::new()),
            Err(e) => return Err(Error::Io(e)),
        };

        codec::decode(&contents).map_err(|e| Error::CorruptLedger {
            path: path.to_path_buf(),
            details: e.to_string(),
        })
    }

    /// Path of the ledger file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// The ledger as currently held in memory.
    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Mutable access to the in-memory ledger.
    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    /// Atomically replace the ledger file with the in-memory ledger.
    ///
    /// The new contents are written to a temporary file in the same
    /// directory, synced, and renamed over the ledger. A failure at any
    /// step leaves the previous file untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PersistFailure`] if any step of the write fails.
    pub fn persist(&self) -> Result<()> {
        let bytes = codec::encode(&self.ledger)?;
        self.write_atomic(&bytes)
            .map_err(|source| Error::PersistFailure {
                path: self.config.path.clone(),
                source,
            })?;

        log::debug!(
            "persisted {} address(es) to {}",
            self.ledger.len(),
            self.config.path.display()
        );
        Ok(())
    }

    fn write_atomic(&self, bytes: &[u8]) -> io::Result<()> {
        let dir = self.config.directory();
        fs::create_dir_all(dir)?;

        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(".tmp")
            .tempfile_in(dir)?;
        temp.write_all(bytes)?;
        temp.as_file().sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            temp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o644))?;
        }

        temp.persist(&self.config.path).map_err(|e| e.error)?;
        sync_directory(dir);
        Ok(())
    }

    /// Release the lock, reporting any failure to do so.
    ///
    /// Dropping the session also releases the lock but only logs failures.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the lock cannot be released.
    pub fn close(self) -> Result<()> {
        self.lock.release()
    }
}

/// Best-effort sync of the directory entry after a rename.
#[cfg(unix)]
fn sync_directory(dir: &Path) {
    if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
        log::debug!("could not sync directory {}: {e}", dir.display());
    }
}

#[cfg(not(unix))]
fn sync_directory(_dir: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_opens_empty() {
        let dir = tempdir().unwrap();
        let session = LedgerSession::open(LedgerConfig::new(dir.path().join("a.json"))).unwrap();
        assert!(session.ledger().is_empty());
        assert!(!dir.path().join("a.json").exists());
    }

    #[test]
    fn test_empty_file_opens_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.json");
        fs::write(&path, "").unwrap();
        let session = LedgerSession::open(LedgerConfig::new(&path)).unwrap();
        assert!(session.ledger().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.json");
        fs::write(&path, "{\"pools\": ").unwrap();

        let err = LedgerSession::open(LedgerConfig::new(&path)).unwrap_err();
        assert!(matches!(err, Error::CorruptLedger { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"pools\": ");
    }

    #[test]
    fn test_persist_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.json");
        let mut session = LedgerSession::open(LedgerConfig::new(&path)).unwrap();
        session
            .ledger_mut()
            .push("rack-a", Ipv4Addr::new(10, 0, 0, 2));
        session.persist().unwrap();
        session.close().unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(TEMP_PREFIX))
            .collect();
        assert!(leftovers.is_empty());
        assert!(fs::read_to_string(&path).unwrap().contains("10.0.0.2"));
    }

    #[test]
    fn test_persist_failure_keeps_previous_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.json");
        let session = LedgerSession::open(LedgerConfig::new(&path)).unwrap();

        // A non-empty directory where the ledger should be cannot be renamed over.
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let err = session.persist().unwrap_err();
        assert!(matches!(err, Error::PersistFailure { .. }));
        assert!(path.join("keep").exists());
    }
}
