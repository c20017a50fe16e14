//! In-memory ledger and its JSON encoding.
//!
//! The ledger records, per pool name, the addresses currently handed out.
//! It has no notion of CIDR blocks; the allocator decides what may go in.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use serde::{Deserialize, Deserializer, Serialize};

/// Addresses assigned from one pool, in allocation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PoolEntries {
    #[serde(default, deserialize_with = "null_as_empty")]
    assigned_ips: Vec<Ipv4Addr>,
}

/// The durable record of assigned addresses.
///
/// Older ledgers kept one flat `assigned_ips` list shared by every pool.
/// Such entries are loaded as *unscoped* addresses: they keep excluding
/// themselves from any pool until released, and are written back as they
/// were.
///
/// # Examples
///
/// ```
/// use ipam::ledger::Ledger;
/// use std::net::Ipv4Addr;
///
/// let mut ledger = Ledger::new();
/// ledger.push("rack-a", Ipv4Addr::new(10, 0, 0, 2));
///
/// assert_eq!(ledger.assigned("rack-a"), &[Ipv4Addr::new(10, 0, 0, 2)]);
/// assert!(ledger.assigned("rack-b").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ledger {
    #[serde(default)]
    pools: BTreeMap<String, PoolEntries>,

    #[serde(
        default,
        rename = "assigned_ips",
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    unscoped: Vec<Ipv4Addr>,
}

impl Ledger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no address is recorded anywhere.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unscoped.is_empty() && self.pools.values().all(|p| p.assigned_ips.is_empty())
    }

    /// Addresses recorded under `pool`.
    #[must_use]
    pub fn assigned(&self, pool: &str) -> &[Ipv4Addr] {
        self.pools
            .get(pool)
            .map(|entries| entries.assigned_ips.as_slice())
            .unwrap_or(&[])
    }

    /// Addresses recorded under `pool` followed by the unscoped entries.
    ///
    /// This is the set an allocation in `pool` must avoid.
    #[must_use]
    pub fn exclusions_for(&self, pool: &str) -> Vec<Ipv4Addr> {
        let mut all = self.assigned(pool).to_vec();
        all.extend_from_slice(&self.unscoped);
        all
    }

    /// Replace the addresses recorded under `pool`.
    ///
    /// An empty list removes the pool's entry.
    pub fn set_assigned(&mut self, pool: &str, assigned: Vec<Ipv4Addr>) {
        if assigned.is_empty() {
            self.pools.remove(pool);
        } else {
            self.pools.entry(pool.to_string()).or_default().assigned_ips = assigned;
        }
    }

    /// Append one address to `pool`.
    pub fn push(&mut self, pool: &str, address: Ipv4Addr) {
        self.pools
            .entry(pool.to_string())
            .or_default()
            .assigned_ips
            .push(address);
    }

    /// Entries from a ledger written before addresses were kept per pool.
    #[must_use]
    pub fn unscoped(&self) -> &[Ipv4Addr] {
        &self.unscoped
    }

    /// Replace the unscoped entries.
    pub fn set_unscoped(&mut self, unscoped: Vec<Ipv4Addr>) {
        self.unscoped = unscoped;
    }

    /// Names of pools with at least one recorded address.
    pub fn pool_names(&self) -> impl Iterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }

    /// Total number of recorded addresses, unscoped entries included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.unscoped.len()
            + self
                .pools
                .values()
                .map(|p| p.assigned_ips.len())
                .sum::<usize>()
    }

    /// Reports the first address recorded twice.
    ///
    /// An address may repeat across pools, but not within one list, and an
    /// unscoped address must not also appear in any pool.
    fn find_duplicate(&self) -> Option<String> {
        let lists = self
            .pools
            .iter()
            .map(|(name, entries)| (name.as_str(), &entries.assigned_ips))
            .chain(std::iter::once(("assigned_ips", &self.unscoped)));

        for (name, list) in lists {
            let mut seen = std::collections::HashSet::with_capacity(list.len());
            for address in list {
                if !seen.insert(*address) {
                    return Some(format!("address {address} appears more than once in '{name}'"));
                }
            }
        }

        for (name, entries) in &self.pools {
            if let Some(address) = entries
                .assigned_ips
                .iter()
                .find(|address| self.unscoped.contains(address))
            {
                return Some(format!(
                    "address {address} appears in both pool '{name}' and the unscoped 'assigned_ips'"
                ));
            }
        }
        None
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode ledger file contents.
///
/// Empty or whitespace-only content is an empty ledger. A list holding the
/// same address twice is rejected, as is an unscoped address that is also
/// recorded under a pool.
///
/// # Errors
///
/// Returns the decoder error if the content is not a valid ledger.
///
/// # Examples
///
/// ```
/// use ipam::ledger::codec::decode;
///
/// let ledger = decode(br#"{"pools": {"rack-a": {"assigned_ips": ["10.0.0.2"]}}}"#).unwrap();
/// assert_eq!(ledger.len(), 1);
/// assert!(decode(b"").unwrap().is_empty());
/// assert!(decode(b"{not json").is_err());
/// ```
pub fn decode(contents: &[u8]) -> Result<Ledger, serde_json::Error> {
    if contents.iter().all(u8::is_ascii_whitespace) {
        return Ok(Ledger::new());
    }

    let ledger: Ledger = serde_json::from_slice(contents)?;
    if let Some(message) = ledger.find_duplicate() {
        return Err(serde::de::Error::custom(message));
    }
    Ok(ledger)
}

/// Encode a ledger as pretty-printed JSON with a trailing newline.
///
/// # Errors
///
/// Returns an error only if serialization itself fails.
pub fn encode(ledger: &Ledger) -> Result<Vec<u8>, serde_json::Error> {
    let mut bytes = serde_json::to_vec_pretty(ledger)?;
    bytes.push(b'\n');
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: u8) -> Ipv4Addr {
        Ipv4Addr::new(10, 0, 0, last)
    }

    #[test]
    fn test_empty_inputs_decode_to_empty_ledger() {
        assert_eq!(decode(b"").unwrap(), Ledger::new());
        assert_eq!(decode(b" \n\t").unwrap(), Ledger::new());
        assert_eq!(decode(b"{}").unwrap(), Ledger::new());
    }

    #[test]
    fn test_decode_per_pool_ledger() {
        let json = br#"{
            "pools": {
                "rack-a": { "assigned_ips": ["10.0.0.2", "10.0.0.3"] },
                "rack-b": { "assigned_ips": ["10.0.1.2"] }
            }
        }"#;
        let ledger = decode(json).unwrap();
        assert_eq!(ledger.assigned("rack-a"), &[addr(2), addr(3)]);
        assert_eq!(ledger.assigned("rack-b"), &[Ipv4Addr::new(10, 0, 1, 2)]);
        assert_eq!(ledger.pool_names().collect::<Vec<_>>(), vec!["rack-a", "rack-b"]);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_decode_legacy_flat_ledger() {
        let ledger = decode(br#"{"assigned_ips": ["10.0.0.2", "10.0.0.5"]}"#).unwrap();
        assert_eq!(ledger.unscoped(), &[addr(2), addr(5)]);
        assert!(ledger.assigned("rack-a").is_empty());
        assert_eq!(ledger.exclusions_for("rack-a"), vec![addr(2), addr(5)]);
    }

    #[test]
    fn test_decode_legacy_null_list() {
        let ledger = decode(br#"{"assigned_ips": null}"#).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_legacy_entries_survive_reencoding() {
        let original = br#"{"assigned_ips": ["10.0.0.2"]}"#;
        let mut ledger = decode(original).unwrap();
        ledger.push("rack-a", addr(3));

        let text = String::from_utf8(encode(&ledger).unwrap()).unwrap();
        assert!(text.contains("\"assigned_ips\": [\n    \"10.0.0.2\"\n  ]"));
        assert_eq!(decode(text.as_bytes()).unwrap(), ledger);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode(b"[1, 2, 3]").is_err());
        assert!(decode(br#"{"assigned_ips": ["10.0.0.999"]}"#).is_err());
        assert!(decode(br#"{"assigned_ips": ["10.0.0.2"], "extra": 1}"#).is_err());
        assert!(decode(b"\x00\x01\x02").is_err());
    }

    #[test]
    fn test_decode_rejects_duplicates() {
        let err = decode(br#"{"pools": {"rack-a": {"assigned_ips": ["10.0.0.2", "10.0.0.2"]}}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("10.0.0.2"));
        assert!(err.to_string().contains("rack-a"));
    }

    #[test]
    fn test_decode_rejects_unscoped_address_also_in_pool() {
        let err = decode(
            br#"{"pools": {"rack-a": {"assigned_ips": ["10.0.0.2"]}}, "assigned_ips": ["10.0.0.2"]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("10.0.0.2"));
        assert!(err.to_string().contains("rack-a"));
    }

    #[test]
    fn test_same_address_in_two_pools_is_allowed() {
        let json = br#"{"pools": {
            "a": {"assigned_ips": ["10.0.0.2"]},
            "b": {"assigned_ips": ["10.0.0.2"]}
        }}"#;
        assert!(decode(json).is_ok());
    }

    #[test]
    fn test_encode_format() {
        let mut ledger = Ledger::new();
        ledger.push("rack-a", addr(2));
        let text = String::from_utf8(encode(&ledger).unwrap()).unwrap();
        assert_eq!(
            text,
            "{\n  \"pools\": {\n    \"rack-a\": {\n      \"assigned_ips\": [\n        \"10.0.0.2\"\n      ]\n    }\n  }\n}\n"
        );
    }

    #[test]
    fn test_set_assigned_empty_removes_pool() {
        let mut ledger = Ledger::new();
        ledger.push("rack-a", addr(2));
        ledger.set_assigned("rack-a", Vec::new());
        assert!(ledger.is_empty());
        assert_eq!(ledger.pool_names().count(), 0);
    }
}
