//! Configuration schema definitions.
//!
//! This module defines the pool configuration file: the list of address
//! pools plus a couple of optional settings for the ledger.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use ipam::config::{Config, Pool};
///
/// let config = Config {
///     pools: vec![Pool::new("rack-a", "10.0.0.0/24")],
///     ..Default::default()
/// };
/// assert_eq!(config.pool(None).unwrap().name, "rack-a");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Ledger file location; the CLI flag takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,

    /// Maximum time to wait for the ledger lock (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_timeout_seconds: Option<u64>,

    /// Address pools, in declaration order.
    #[serde(default)]
    pub pools: Vec<Pool>,
}

impl Config {
    /// Select a pool by name, or the first declared pool when `name` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPool`] if no pool has that name, or
    /// [`Error::NoPools`] if the configuration is empty.
    pub fn pool(&self, name: Option<&str>) -> Result<&Pool> {
        match name {
            Some(name) => self
                .pools
                .iter()
                .find(|pool| pool.name == name)
                .ok_or_else(|| Error::UnknownPool {
                    name: name.to_string(),
                }),
            None => self.pools.first().ok_or(Error::NoPools),
        }
    }

    /// The configured lock wait, if any.
    #[must_use]
    pub fn lock_timeout(&self) -> Option<Duration> {
        self.lock_timeout_seconds.map(Duration::from_secs)
    }
}

/// A statically configured address pool.
///
/// Values are kept as written in the configuration file; they are parsed
/// where they are used so malformed entries surface as typed errors.
///
/// # Examples
///
/// ```
/// use ipam::config::Pool;
///
/// let pool = Pool::new("rack-a", "10.0.0.0/24")
///     .with_gateway("10.0.0.1")
///     .with_dns(["1.1.1.1", "8.8.8.8"])
///     .with_reserved(["10.0.0.1"]);
/// assert_eq!(pool.dns.len(), 2);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Pool {
    /// Unique pool identifier.
    pub name: String,

    /// CIDR block, e.g. `10.0.0.0/24`.
    pub cidr: String,

    /// Default gateway handed out with each address.
    #[serde(default)]
    pub gateway: String,

    /// DNS servers, in order of preference.
    #[serde(default)]
    pub dns: Vec<String>,

    /// Addresses that are never allocated.
    #[serde(default)]
    pub reserved: Vec<String>,
}

impl Pool {
    /// Create a pool with no gateway, DNS servers or reservations.
    pub fn new(name: impl Into<String>, cidr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cidr: cidr.into(),
            gateway: String::new(),
            dns: Vec::new(),
            reserved: Vec::new(),
        }
    }

    /// Set the gateway address.
    #[must_use]
    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = gateway.into();
        self
    }

    /// Set the DNS server list.
    #[must_use]
    pub fn with_dns<I, S>(mut self, dns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dns = dns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the reserved address list.
    #[must_use]
    pub fn with_reserved<I, S>(mut self, reserved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved = reserved.into_iter().map(Into::into).collect();
        self
    }
}
