//! The durable ledger of assigned addresses.
//!
//! The ledger is a small JSON file recording, per pool, which addresses are
//! handed out. All access goes through a [`LedgerSession`], which holds an
//! exclusive advisory lock from open to close so that concurrent
//! invocations, threads or processes, serialize their read-modify-write
//! cycles instead of handing out the same address twice.
//!
//! Writes are atomic: a crash or failure mid-persist leaves either the old
//! or the new file on disk, never a partial one.

pub mod codec;
mod config;
mod lock;
mod session;

#[cfg(test)]
mod proptests;

pub use codec::Ledger;
pub use config::{default_data_dir, default_ledger_path, LedgerConfig};
pub use session::LedgerSession;
