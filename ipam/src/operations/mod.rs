//! Ledger operations.
//!
//! Each operation runs one read-modify-write cycle against an open
//! [`LedgerSession`](crate::ledger::LedgerSession): it reads the assigned
//! set, asks the allocation engine what to do, applies the change in
//! memory and persists it. If the persist fails the in-memory ledger is
//! restored before the error is returned, so a session never holds a
//! change that is not on disk.
//!
//! # Examples
//!
//! ```
//! use ipam::config::Pool;
//! use ipam::ledger::{LedgerConfig, LedgerSession};
//! use ipam::operations::{allocate, release};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let pool = Pool::new("rack-a", "10.0.0.0/29")
//!     .with_gateway("10.0.0.1")
//!     .with_reserved(["10.0.0.1"]);
//!
//! let mut session = LedgerSession::open(LedgerConfig::new(dir.path().join("a.json"))).unwrap();
//! let allocation = allocate(&mut session, &pool).unwrap();
//! assert_eq!(allocation.ip.to_string(), "10.0.0.2");
//!
//! release(&mut session, &pool, "10.0.0.2").unwrap();
//! assert!(session.ledger().is_empty());
//! ```

pub mod allocate;
pub mod list;
pub mod release;

pub use allocate::{allocate, Allocation};
pub use list::{status, PoolStatus};
pub use release::release;

use crate::error::Result;
use crate::ledger::{Ledger, LedgerSession};

/// Persist the session, restoring `before` in memory if that fails.
fn commit(session: &mut LedgerSession, before: Ledger) -> Result<()> {
    if let Err(e) = session.persist() {
        log::warn!("persist failed, discarding in-memory change: {e}");
        *session.ledger_mut() = before;
        return Err(e);
    }
    Ok(())
}
