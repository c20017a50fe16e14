//! Address allocation over a single pool.
//!
//! The allocator is pure: it takes a pool definition and the addresses the
//! ledger currently holds, and answers which address to hand out next or
//! whether an address may be released. The caller owns the ledger and
//! applies the result.

use std::net::Ipv4Addr;

use serde::Serialize;

use crate::config::Pool;
use crate::error::{Error, Result};

use super::exclusions::ExclusionIndex;
use super::{parse_address, HostRange};

/// Counters describing how full a pool is.
///
/// # Examples
///
/// ```
/// use ipam::config::Pool;
/// use ipam::pool::PoolAllocator;
/// use std::net::Ipv4Addr;
///
/// let pool = Pool::new("rack-a", "10.0.0.0/29").with_reserved(["10.0.0.1"]);
/// let allocator = PoolAllocator::from_pool(&pool).unwrap();
/// let usage = allocator.usage(&[Ipv4Addr::new(10, 0, 0, 2)]);
///
/// assert_eq!(usage.hosts, 6);
/// assert_eq!(usage.reserved, 1);
/// assert_eq!(usage.assigned, 1);
/// assert_eq!(usage.free, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolUsage {
    /// Host addresses in the block (network and broadcast excluded).
    pub hosts: u64,
    /// Reserved addresses that fall on host addresses of the block.
    pub reserved: u64,
    /// Assigned addresses that fall on host addresses of the block.
    pub assigned: u64,
    /// Host addresses that are neither reserved nor assigned.
    pub free: u64,
}

/// Stateless allocator for one pool.
///
/// Construction parses the pool's CIDR and reserved list once; the
/// assigned set is passed to each call because it belongs to the ledger.
///
/// # Examples
///
/// ```
/// use ipam::config::Pool;
/// use ipam::pool::PoolAllocator;
/// use std::net::Ipv4Addr;
///
/// let pool = Pool::new("rack-a", "10.0.0.0/29").with_reserved(["10.0.0.1"]);
/// let allocator = PoolAllocator::from_pool(&pool).unwrap();
///
/// assert_eq!(allocator.allocate(&[]).unwrap(), Ipv4Addr::new(10, 0, 0, 2));
/// ```
#[derive(Debug, Clone)]
pub struct PoolAllocator {
    name: String,
    range: HostRange,
    reserved: ExclusionIndex,
}

impl PoolAllocator {
    /// Create an allocator for `pool`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCidr`] if the CIDR cannot be parsed, or
    /// [`Error::Validation`] if a reserved entry is not an address.
    pub fn from_pool(pool: &Pool) -> Result<Self> {
        let range = HostRange::parse(&pool.cidr)?;

        let mut reserved = ExclusionIndex::empty();
        for entry in &pool.reserved {
            let address = parse_address(entry).map_err(|e| Error::Validation {
                field: format!("pools.{}.reserved", pool.name),
                message: e.to_string(),
            })?;
            reserved.insert(address);
        }

        Ok(Self {
            name: pool.name.clone(),
            range,
            reserved,
        })
    }

    /// The pool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The host range of the pool.
    #[must_use]
    pub const fn range(&self) -> &HostRange {
        &self.range
    }

    /// Pick the lowest host address that is neither reserved nor assigned.
    ///
    /// The result is deterministic for a given pool and assigned set. The
    /// assigned set is not modified; the caller records the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PoolExhausted`] if no eligible address remains.
    pub fn allocate(&self, assigned: &[Ipv4Addr]) -> Result<Ipv4Addr> {
        let assigned = ExclusionIndex::from_addresses(assigned.iter().copied());

        match self.reserved.first_free_with(&assigned, &self.range) {
            Some(address) => {
                log::debug!(
                    "pool '{}': allocated {address} ({} reserved, {} assigned in {})",
                    self.name,
                    self.reserved.count_in(&self.range),
                    assigned.count_in(&self.range),
                    self.range
                );
                Ok(address)
            }
            None => Err(Error::PoolExhausted {
                pool: self.name.clone(),
                cidr: self.range.to_string(),
            }),
        }
    }

    /// Parse `address` and confirm it lies inside the pool's CIDR block.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if `address` does not parse, or
    /// [`Error::AddressNotInPool`] if it lies outside the block.
    pub fn validate_membership(&self, address: &str) -> Result<Ipv4Addr> {
        let parsed = parse_address(address)?;
        if self.range.contains(parsed) {
            Ok(parsed)
        } else {
            Err(Error::AddressNotInPool {
                address: parsed,
                pool: self.name.clone(),
                cidr: self.range.to_string(),
            })
        }
    }

    /// Return `assigned` with exactly one occurrence of `address` removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAssigned`] if `address` is not in `assigned`.
    pub fn release(&self, assigned: &[Ipv4Addr], address: Ipv4Addr) -> Result<Vec<Ipv4Addr>> {
        let position = assigned
            .iter()
            .position(|candidate| *candidate == address)
            .ok_or_else(|| Error::NotAssigned {
                address,
                pool: self.name.clone(),
            })?;

        let mut remaining = assigned.to_vec();
        remaining.remove(position);
        Ok(remaining)
    }

    /// Summarize how many host addresses are reserved, assigned and free.
    #[must_use]
    pub fn usage(&self, assigned: &[Ipv4Addr]) -> PoolUsage {
        let hosts = self.range.len();
        let reserved = self.reserved.count_in(&self.range) as u64;

        let assigned_index = ExclusionIndex::from_addresses(
            assigned
                .iter()
                .copied()
                .filter(|address| !self.reserved.is_excluded(*address)),
        );
        let assigned = assigned_index.count_in(&self.range) as u64;

        PoolUsage {
            hosts,
            reserved,
            assigned,
            free: hosts.saturating_sub(reserved + assigned),
        }
    }
}

/// Allocate the lowest free address of `pool`.
///
/// # Errors
///
/// Returns [`Error::InvalidCidr`] for a malformed CIDR and
/// [`Error::PoolExhausted`] when nothing is left.
///
/// # Examples
///
/// ```
/// use ipam::config::Pool;
/// use ipam::pool::allocate;
/// use std::net::Ipv4Addr;
///
/// let pool = Pool::new("rack-a", "10.0.0.0/30");
/// let taken = [Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2)];
/// assert!(allocate(&pool, &taken).is_err());
/// ```
pub fn allocate(pool: &Pool, assigned: &[Ipv4Addr]) -> Result<Ipv4Addr> {
    PoolAllocator::from_pool(pool)?.allocate(assigned)
}

/// Confirm that `address` parses and lies inside `pool`.
///
/// # Errors
///
/// See [`PoolAllocator::validate_membership`].
pub fn validate_membership(address: &str, pool: &Pool) -> Result<Ipv4Addr> {
    PoolAllocator::from_pool(pool)?.validate_membership(address)
}

/// Remove one occurrence of `address` from the assigned set of `pool`.
///
/// # Errors
///
/// See [`PoolAllocator::release`].
pub fn release(pool: &Pool, assigned: &[Ipv4Addr], address: Ipv4Addr) -> Result<Vec<Ipv4Addr>> {
    PoolAllocator::from_pool(pool)?.release(assigned, address)
}
