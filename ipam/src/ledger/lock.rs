//! Exclusive advisory lock on the ledger's sidecar lock file.
//!
//! The lock is taken on `<ledger>.lock` rather than on the ledger itself:
//! the ledger is replaced by rename on every persist, and a lock held on a
//! replaced inode would no longer exclude anyone.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;

use crate::error::{Error, Result};

/// Delay between non-blocking attempts while waiting with a timeout.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// A held exclusive lock. Dropping it releases the lock.
#[derive(Debug)]
pub(super) struct LedgerLock {
    file: Option<File>,
    path: PathBuf,
}

impl LedgerLock {
    /// Open (creating if needed) and lock `path`.
    ///
    /// With `timeout == None` this blocks until the lock is free.
    pub(super) fn acquire(path: &Path, timeout: Option<Duration>) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        match timeout {
            None => FileExt::lock_exclusive(&file)?,
            Some(timeout) => Self::poll_lock(&file, path, timeout)?,
        }

        log::debug!("acquired ledger lock {}", path.display());
        Ok(Self {
            file: Some(file),
            path: path.to_path_buf(),
        })
    }

    fn poll_lock(file: &File, path: &Path, timeout: Duration) -> Result<()> {
        let started = Instant::now();
        let contended = fs2::lock_contended_error().kind();

        loop {
            match FileExt::try_lock_exclusive(file) {
                Ok(()) => return Ok(()),
                Err(e) if e.kind() == contended || e.kind() == io::ErrorKind::WouldBlock => {
                    let waited = started.elapsed();
                    if waited >= timeout {
                        return Err(Error::LockUnavailable {
                            path: path.to_path_buf(),
                            waited,
                        });
                    }
                    thread::sleep(POLL_INTERVAL.min(timeout - waited));
                }
                Err(e) => return Err(Error::Io(e)),
            }
        }
    }

    /// Release the lock now, reporting any unlock failure.
    pub(super) fn release(mut self) -> Result<()> {
        if let Some(file) = self.file.take() {
            FileExt::unlock(&file)?;
            log::debug!("released ledger lock {}", self.path.display());
        }
        Ok(())
    }
}

impl Drop for LedgerLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            if let Err(e) = FileExt::unlock(&file) {
                log::warn!("failed to unlock {}: {e}", self.path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_acquire_creates_lock_file_and_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.json.lock");

        let lock = LedgerLock::acquire(&path, None).unwrap();
        assert!(path.exists());
        lock.release().unwrap();
    }

    #[test]
    fn test_second_lock_times_out_while_held() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json.lock");

        let held = LedgerLock::acquire(&path, None).unwrap();
        let err = LedgerLock::acquire(&path, Some(Duration::from_millis(100))).unwrap_err();
        match err {
            Error::LockUnavailable { waited, .. } => {
                assert!(waited >= Duration::from_millis(100));
            }
            other => panic!("expected LockUnavailable, got {other:?}"),
        }

        drop(held);
        let again = LedgerLock::acquire(&path, Some(Duration::from_millis(100))).unwrap();
        again.release().unwrap();
    }

    #[test]
    fn test_zero_timeout_succeeds_when_free() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json.lock");
        let lock = LedgerLock::acquire(&path, Some(Duration::ZERO)).unwrap();
        drop(lock);
    }
}
