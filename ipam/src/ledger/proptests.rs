use std::collections::BTreeSet;
use std::net::Ipv4Addr;

use proptest::prelude::*;

use super::codec::{decode, encode, Ledger};

fn pool_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,11}"
}

fn address_list() -> impl Strategy<Value = Vec<Ipv4Addr>> {
    prop::collection::btree_set(any::<u32>(), 0..16)
        .prop_map(|set: BTreeSet<u32>| set.into_iter().map(Ipv4Addr::from).collect())
}

prop_compose! {
    fn ledger()(
        pools in prop::collection::btree_map(pool_name(), address_list(), 0..4),
        unscoped in address_list(),
    ) -> Ledger {
        let mut ledger = Ledger::new();
        for (name, assigned) in pools {
            ledger.set_assigned(&name, assigned);
        }
        let pooled: BTreeSet<Ipv4Addr> = ledger
            .pool_names()
            .flat_map(|name| ledger.assigned(name).iter().copied())
            .collect();
        ledger.set_unscoped(unscoped.into_iter().filter(|a| !pooled.contains(a)).collect());
        ledger
    }
}

proptest! {
    #[test]
    fn encoded_ledger_decodes_to_itself(ledger in ledger()) {
        let bytes = encode(&ledger).unwrap();
        prop_assert_eq!(decode(&bytes).unwrap(), ledger);
    }

    #[test]
    fn len_counts_every_list(ledger in ledger()) {
        let per_pool: usize = ledger.pool_names().map(|p| ledger.assigned(p).len()).sum();
        prop_assert_eq!(ledger.len(), per_pool + ledger.unscoped().len());
        prop_assert_eq!(ledger.is_empty(), ledger.len() == 0);
    }

    #[test]
    fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode(&bytes);
    }
}
