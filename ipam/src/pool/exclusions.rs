//! Sorted index of addresses that must not be handed out.
//!
//! The allocator merges a pool's reserved addresses and the ledger's
//! assigned addresses into one [`ExclusionIndex`]. Because the index is
//! ordered, finding the lowest free host walks only the exclusions at the
//! bottom of the range instead of every address in the block.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;

use super::HostRange;

/// Ordered set of excluded addresses.
///
/// # Examples
///
/// ```
/// use ipam::pool::{ExclusionIndex, HostRange};
/// use std::net::Ipv4Addr;
///
/// let range = HostRange::parse("10.0.0.0/29").unwrap();
/// let index = ExclusionIndex::from_addresses([
///     Ipv4Addr::new(10, 0, 0, 1),
///     Ipv4Addr::new(10, 0, 0, 2),
/// ]);
///
/// assert!(index.is_excluded(Ipv4Addr::new(10, 0, 0, 1)));
/// assert_eq!(index.first_free(&range), Some(Ipv4Addr::new(10, 0, 0, 3)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionIndex {
    excluded: BTreeSet<u32>,
}

impl ExclusionIndex {
    /// Create an empty index.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an index from any collection of addresses.
    pub fn from_addresses<I>(addresses: I) -> Self
    where
        I: IntoIterator<Item = Ipv4Addr>,
    {
        Self {
            excluded: addresses.into_iter().map(u32::from).collect(),
        }
    }

    /// Add an address. Returns `false` if it was already present.
    pub fn insert(&mut self, address: Ipv4Addr) -> bool {
        self.excluded.insert(u32::from(address))
    }

    /// Add every address from `addresses`.
    pub fn extend<I>(&mut self, addresses: I)
    where
        I: IntoIterator<Item = Ipv4Addr>,
    {
        self.excluded.extend(addresses.into_iter().map(u32::from));
    }

    /// Check if an address is excluded.
    #[must_use]
    pub fn is_excluded(&self, address: Ipv4Addr) -> bool {
        self.excluded.contains(&u32::from(address))
    }

    /// Number of distinct excluded addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.excluded.len()
    }

    /// Returns `true` if nothing is excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.excluded.is_empty()
    }

    /// Number of excluded addresses that are host addresses of `range`.
    #[must_use]
    pub fn count_in(&self, range: &HostRange) -> usize {
        range
            .bounds()
            .map_or(0, |(first, last)| self.excluded.range(first..=last).count())
    }

    /// Lowest host address of `range` that is not excluded.
    ///
    /// Exclusions are visited in ascending order starting at the bottom of
    /// the range; the first gap in that run is the answer.
    #[must_use]
    pub fn first_free(&self, range: &HostRange) -> Option<Ipv4Addr> {
        let (first, last) = range.bounds()?;
        let mut candidate = first;

        for &excluded in self.excluded.range(first..=last) {
            if excluded != candidate {
                break;
            }
            if candidate == last {
                return None;
            }
            candidate += 1;
        }

        Some(Ipv4Addr::from(candidate))
    }

    /// Lowest host address of `range` excluded by neither `self` nor `other`.
    ///
    /// Both indexes are walked together in ascending order, so neither has
    /// to be copied into the other.
    #[must_use]
    pub fn first_free_with(&self, other: &Self, range: &HostRange) -> Option<Ipv4Addr> {
        let (first, last) = range.bounds()?;
        let mut ours = self.excluded.range(first..=last).copied().peekable();
        let mut theirs = other.excluded.range(first..=last).copied().peekable();
        let mut candidate = first;

        loop {
            while ours.next_if(|&a| a < candidate).is_some() {}
            while theirs.next_if(|&a| a < candidate).is_some() {}

            if ours.peek() != Some(&candidate) && theirs.peek() != Some(&candidate) {
                return Some(Ipv4Addr::from(candidate));
            }
            if candidate == last {
                return None;
            }
            candidate += 1;
        }
    }
}
