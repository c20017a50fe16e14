//! Address pool types and the allocation engine.
//!
//! This module parses a pool's CIDR block into the range of host addresses
//! it can hand out, and hosts the pure allocation logic in [`allocator`].
//! Nothing here touches storage.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use ipnet::Ipv4Net;

use crate::error::{Error, Result};

pub mod allocator;
pub mod exclusions;

#[cfg(test)]
mod proptests;

pub use allocator::{allocate, release, validate_membership, PoolAllocator, PoolUsage};
pub use exclusions::ExclusionIndex;

/// Parses a CIDR block such as `10.0.0.0/24`.
///
/// An address with host bits set (`10.0.0.5/29`) is accepted and truncated
/// to its network.
///
/// # Errors
///
/// Returns [`Error::InvalidCidr`] if the text is not an IPv4 prefix.
///
/// # Examples
///
/// ```
/// use ipam::pool::parse_cidr;
///
/// let net = parse_cidr("10.0.0.5/29").unwrap();
/// assert_eq!(net.to_string(), "10.0.0.0/29");
/// assert!(parse_cidr("10.0.0.0/33").is_err());
/// ```
pub fn parse_cidr(cidr: &str) -> Result<Ipv4Net> {
    Ipv4Net::from_str(cidr.trim())
        .map(|net| net.trunc())
        .map_err(|e| Error::InvalidCidr {
            cidr: cidr.to_string(),
            reason: e.to_string(),
        })
}

/// Parses a dotted-quad IPv4 address.
///
/// # Errors
///
/// Returns [`Error::InvalidAddress`] if the text is not an IPv4 address.
///
/// # Examples
///
/// ```
/// use ipam::pool::parse_address;
/// use std::net::Ipv4Addr;
///
/// assert_eq!(parse_address("10.0.0.2").unwrap(), Ipv4Addr::new(10, 0, 0, 2));
/// assert!(parse_address("10.0.0.256").is_err());
/// ```
pub fn parse_address(value: &str) -> Result<Ipv4Addr> {
    Ipv4Addr::from_str(value.trim()).map_err(|e| Error::InvalidAddress {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// The host addresses of a CIDR block, network and broadcast excluded.
///
/// `/31` and `/32` blocks have no host addresses.
///
/// # Examples
///
/// ```
/// use ipam::pool::HostRange;
/// use std::net::Ipv4Addr;
///
/// let range = HostRange::parse("10.0.0.0/29").unwrap();
/// assert_eq!(range.len(), 6);
/// assert_eq!(range.first(), Some(Ipv4Addr::new(10, 0, 0, 1)));
/// assert_eq!(range.last(), Some(Ipv4Addr::new(10, 0, 0, 6)));
/// assert!(!range.contains_host(Ipv4Addr::new(10, 0, 0, 7)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostRange {
    network: Ipv4Net,
    bounds: Option<(u32, u32)>,
}

impl HostRange {
    /// Creates the host range of an already parsed network.
    #[must_use]
    pub fn new(network: Ipv4Net) -> Self {
        let network = network.trunc();
        let first = u32::from(network.network());
        let last = u32::from(network.broadcast());
        // Needs at least one address strictly between network and broadcast.
        let bounds = if last.saturating_sub(first) >= 2 {
            Some((first + 1, last - 1))
        } else {
            None
        };
        Self { network, bounds }
    }

    /// Parses a CIDR block into its host range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCidr`] if the CIDR cannot be parsed.
    pub fn parse(cidr: &str) -> Result<Self> {
        parse_cidr(cidr).map(Self::new)
    }

    /// Returns the network this range belongs to.
    #[must_use]
    pub const fn network(&self) -> Ipv4Net {
        self.network
    }

    /// Returns the prefix length of the network.
    #[must_use]
    pub fn prefix_len(&self) -> u8 {
        self.network.prefix_len()
    }

    /// Returns the lowest host address, if any.
    #[must_use]
    pub fn first(&self) -> Option<Ipv4Addr> {
        self.bounds.map(|(first, _)| Ipv4Addr::from(first))
    }

    /// Returns the highest host address, if any.
    #[must_use]
    pub fn last(&self) -> Option<Ipv4Addr> {
        self.bounds.map(|(_, last)| Ipv4Addr::from(last))
    }

    /// Returns the numeric bounds (inclusive) of the host range.
    #[must_use]
    pub const fn bounds(&self) -> Option<(u32, u32)> {
        self.bounds
    }

    /// Returns the number of host addresses.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.bounds
            .map_or(0, |(first, last)| u64::from(last - first) + 1)
    }

    /// Returns `true` if the block has no host addresses.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Returns `true` if `address` is inside the CIDR block at all,
    /// including the network and broadcast addresses.
    #[must_use]
    pub fn contains(&self, address: Ipv4Addr) -> bool {
        self.network.contains(&address)
    }

    /// Returns `true` if `address` is a host address of this block.
    #[must_use]
    pub fn contains_host(&self, address: Ipv4Addr) -> bool {
        let value = u32::from(address);
        self.bounds
            .is_some_and(|(first, last)| value >= first && value <= last)
    }

    /// Returns an iterator over all host addresses in ascending order.
    #[must_use]
    pub fn iter(&self) -> HostIter {
        match self.bounds {
            Some((first, last)) => HostIter {
                next: Some(first),
                last,
            },
            None => HostIter { next: None, last: 0 },
        }
    }
}

impl fmt::Display for HostRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.network)
    }
}

impl IntoIterator for HostRange {
    type Item = Ipv4Addr;
    type IntoIter = HostIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the host addresses of a [`HostRange`].
#[derive(Debug)]
pub struct HostIter {
    next: Option<u32>,
    last: u32,
}

impl Iterator for HostIter {
    type Item = Ipv4Addr;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = if current < self.last {
            Some(current + 1)
        } else {
            None
        };
        Some(Ipv4Addr::from(current))
    }
}
