#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # ipam
//!
//! A library for handing out IPv4 addresses from configured pools.
//!
//! Addresses are allocated lowest-first from a pool's CIDR block, skipping
//! the network and broadcast addresses, the pool's reserved list and
//! everything already recorded in the ledger. The ledger is a JSON file
//! guarded by an advisory lock, so separate invocations never hand out the
//! same address twice.
//!
//! ## Core Types
//!
//! - [`Pool`] and [`Config`]: pool definitions loaded from YAML
//! - [`PoolAllocator`]: the pure allocation engine
//! - [`Ledger`] and [`LedgerSession`]: the locked, durable assignment record
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use ipam::{allocate, LedgerConfig, LedgerSession, Pool};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let pool = Pool::new("rack-a", "10.0.0.0/24")
//!     .with_gateway("10.0.0.1")
//!     .with_reserved(["10.0.0.1"]);
//!
//! let mut session = LedgerSession::open(LedgerConfig::new(dir.path().join("assigned.json"))).unwrap();
//! let first = allocate(&mut session, &pool).unwrap();
//! let second = allocate(&mut session, &pool).unwrap();
//! session.close().unwrap();
//!
//! assert_eq!(first.ip.to_string(), "10.0.0.2");
//! assert_eq!(second.ip.to_string(), "10.0.0.3");
//! ```

pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod operations;
pub mod pool;
pub mod probe;
pub mod render;
pub mod report;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigLoader, ConfigValidator, Pool};
pub use error::{Error, Result};
pub use ledger::{Ledger, LedgerConfig, LedgerSession};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{allocate, release, status, Allocation, PoolStatus};
pub use pool::{HostRange, PoolAllocator, PoolUsage};
pub use probe::{ReachabilityProbe, TcpProbe};
pub use report::DeliveryReport;
