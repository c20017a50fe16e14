use std::collections::HashSet;
use std::net::Ipv4Addr;

use proptest::prelude::*;

use super::{allocate, release, HostRange};
use crate::config::Pool;

/// Small blocks anchored at 10.0.0.0 so that random offsets hit them often.
fn small_pool() -> impl Strategy<Value = (Pool, HostRange)> {
    (24u8..=32).prop_map(|prefix| {
        let cidr = format!("10.0.0.0/{prefix}");
        let range = HostRange::parse(&cidr).unwrap();
        (Pool::new("rack-a", cidr), range)
    })
}

fn offsets() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

fn to_addresses(offsets: &[u8]) -> Vec<Ipv4Addr> {
    let unique: HashSet<u8> = offsets.iter().copied().collect();
    unique.into_iter().map(|o| Ipv4Addr::new(10, 0, 0, o)).collect()
}

/// Linear scan used as the reference answer.
fn lowest_free(range: &HostRange, reserved: &[Ipv4Addr], assigned: &[Ipv4Addr]) -> Option<Ipv4Addr> {
    range
        .iter()
        .find(|candidate| !reserved.contains(candidate) && !assigned.contains(candidate))
}

proptest! {
    #[test]
    fn allocation_matches_linear_scan(
        (pool, range) in small_pool(),
        reserved in offsets(),
        assigned in offsets(),
    ) {
        let reserved = to_addresses(&reserved);
        let assigned = to_addresses(&assigned);
        let pool = pool.with_reserved(reserved.iter().map(ToString::to_string));

        let expected = lowest_free(&range, &reserved, &assigned);
        match allocate(&pool, &assigned) {
            Ok(address) => prop_assert_eq!(Some(address), expected),
            Err(_) => prop_assert_eq!(None, expected),
        }
    }

    #[test]
    fn allocation_is_deterministic((pool, _range) in small_pool(), assigned in offsets()) {
        let assigned = to_addresses(&assigned);
        let first = allocate(&pool, &assigned).ok();
        let second = allocate(&pool, &assigned).ok();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn allocation_never_returns_network_or_broadcast(
        (pool, range) in small_pool(),
        assigned in offsets(),
    ) {
        let assigned = to_addresses(&assigned);
        if let Ok(address) = allocate(&pool, &assigned) {
            prop_assert!(range.contains_host(address));
            prop_assert_ne!(address, range.network().network());
            prop_assert_ne!(address, range.network().broadcast());
        }
    }

    #[test]
    fn repeated_allocation_yields_distinct_addresses(
        (pool, range) in small_pool(),
        count in 1usize..40,
    ) {
        let mut assigned = Vec::new();
        for _ in 0..count {
            match allocate(&pool, &assigned) {
                Ok(address) => assigned.push(address),
                Err(_) => break,
            }
        }

        let unique: HashSet<_> = assigned.iter().collect();
        prop_assert_eq!(unique.len(), assigned.len());
        let expected = usize::try_from(range.len()).unwrap().min(count);
        prop_assert_eq!(assigned.len(), expected);
    }

    #[test]
    fn release_makes_address_allocatable_again(
        (pool, _range) in small_pool(),
        count in 1usize..20,
        pick in any::<prop::sample::Index>(),
    ) {
        let mut assigned = Vec::new();
        for _ in 0..count {
            match allocate(&pool, &assigned) {
                Ok(address) => assigned.push(address),
                Err(_) => break,
            }
        }
        prop_assume!(!assigned.is_empty());

        let victim = assigned[pick.index(assigned.len())];
        let remaining = release(&pool, &assigned, victim).unwrap();
        prop_assert_eq!(remaining.len(), assigned.len() - 1);
        prop_assert!(!remaining.contains(&victim));
        prop_assert_eq!(allocate(&pool, &remaining).unwrap(), victim);
    }
}
