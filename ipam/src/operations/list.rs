//! Pool usage reporting.

use std::net::Ipv4Addr;

use serde::Serialize;

use crate::config::Pool;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::pool::{PoolAllocator, PoolUsage};

/// Usage of one pool as recorded in a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolStatus {
    /// Pool name.
    pub pool: String,
    /// The pool's block, normalized to its network address.
    pub cidr: String,
    /// Counters for the block.
    pub usage: PoolUsage,
    /// Addresses recorded for the pool, in ascending order.
    pub assigned: Vec<Ipv4Addr>,
}

/// Summarize `pool` against `ledger`.
///
/// Legacy unscoped entries that fall inside the pool count as assigned.
///
/// # Errors
///
/// Returns configuration errors if the pool definition is malformed.
pub fn status(ledger: &Ledger, pool: &Pool) -> Result<PoolStatus> {
    let allocator = PoolAllocator::from_pool(pool)?;
    let range = allocator.range();

    let mut assigned: Vec<Ipv4Addr> = ledger
        .exclusions_for(&pool.name)
        .into_iter()
        .filter(|address| range.contains(*address))
        .collect();
    assigned.sort_unstable();
    assigned.dedup();

    Ok(PoolStatus {
        pool: pool.name.clone(),
        cidr: range.to_string(),
        usage: allocator.usage(&assigned),
        assigned,
    })
}
