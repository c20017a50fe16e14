//! Allocate the next free address of a pool.

use std::net::Ipv4Addr;

use serde::Serialize;

use crate::config::Pool;
use crate::error::Result;
use crate::ledger::LedgerSession;
use crate::pool::PoolAllocator;

use super::commit;

/// A recorded allocation and the network settings that go with it.
///
/// Serializes as `{"ip": ..., "gateway": ..., "dns": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Allocation {
    /// Pool the address came from.
    #[serde(skip)]
    pub pool: String,

    /// The allocated address.
    pub ip: Ipv4Addr,

    /// The pool's gateway, as configured.
    pub gateway: String,

    /// The pool's DNS servers, as configured.
    pub dns: Vec<String>,

    /// Prefix length of the pool's block.
    #[serde(skip)]
    pub prefix_len: u8,
}

/// Allocate the lowest free address of `pool` and persist it.
///
/// Addresses recorded for the pool and any legacy unscoped entries are
/// excluded, together with the pool's reserved list.
///
/// # Errors
///
/// Returns [`Error::PoolExhausted`](crate::Error::PoolExhausted) when
/// nothing is free, configuration errors for a malformed pool, and
/// [`Error::PersistFailure`](crate::Error::PersistFailure) if the ledger
/// cannot be written. The session's ledger is unchanged on error.
pub fn allocate(session: &mut LedgerSession, pool: &Pool) -> Result<Allocation> {
    let allocator = PoolAllocator::from_pool(pool)?;
    let exclusions = session.ledger().exclusions_for(&pool.name);
    let ip = allocator.allocate(&exclusions)?;

    let before = session.ledger().clone();
    session.ledger_mut().push(&pool.name, ip);
    commit(session, before)?;

    log::info!("allocated {ip} from pool '{}'", pool.name);
    Ok(Allocation {
        pool: pool.name.clone(),
        ip,
        gateway: pool.gateway.clone(),
        dns: pool.dns.clone(),
        prefix_len: allocator.range().prefix_len(),
    })
}
