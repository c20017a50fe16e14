//! Reachability checks for freshly provisioned hosts.
//!
//! A host counts as reachable when a TCP connection to a known port (SSH by
//! default) succeeds within a timeout. The check sits behind a trait so
//! callers can substitute a fixed answer in tests.

use std::collections::HashSet;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpStream};
use std::time::Duration;

/// Port probed when none is configured.
pub const DEFAULT_PORT: u16 = 22;

/// Connection timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Answers whether a host is reachable.
pub trait ReachabilityProbe: Send + Sync {
    /// Returns `true` if `address` accepted a connection.
    fn is_reachable(&self, address: Ipv4Addr) -> bool;
}

/// Probes by opening a TCP connection.
///
/// # Examples
///
/// ```
/// use ipam::probe::{ReachabilityProbe, TcpProbe};
/// use std::net::{Ipv4Addr, TcpListener};
/// use std::time::Duration;
///
/// let listener = TcpListener::bind("127.0.0.1:0").unwrap();
/// let port = listener.local_addr().unwrap().port();
///
/// let probe = TcpProbe::new(port, Duration::from_secs(1));
/// assert!(probe.is_reachable(Ipv4Addr::LOCALHOST));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpProbe {
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    /// Probe `port`, waiting at most `timeout` for the connection.
    #[must_use]
    pub const fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }

    /// The port being probed.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PORT, DEFAULT_TIMEOUT)
    }
}

impl ReachabilityProbe for TcpProbe {
    fn is_reachable(&self, address: Ipv4Addr) -> bool {
        let target = SocketAddr::V4(SocketAddrV4::new(address, self.port));
        match TcpStream::connect_timeout(&target, self.timeout) {
            Ok(_) => {
                log::debug!("{target} accepted a connection");
                true
            }
            Err(e) => {
                log::debug!("{target} unreachable: {e}");
                false
            }
        }
    }
}

/// Probe with a fixed set of reachable hosts.
///
/// # Examples
///
/// ```
/// use ipam::probe::{ReachabilityProbe, StaticProbe};
/// use std::net::Ipv4Addr;
///
/// let probe = StaticProbe::new([Ipv4Addr::new(10, 0, 0, 2)]);
/// assert!(probe.is_reachable(Ipv4Addr::new(10, 0, 0, 2)));
/// assert!(!probe.is_reachable(Ipv4Addr::new(10, 0, 0, 3)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    reachable: HashSet<Ipv4Addr>,
}

impl StaticProbe {
    /// A probe that answers `true` exactly for `reachable`.
    pub fn new(reachable: impl IntoIterator<Item = Ipv4Addr>) -> Self {
        Self {
            reachable: reachable.into_iter().collect(),
        }
    }
}

impl ReachabilityProbe for StaticProbe {
    fn is_reachable(&self, address: Ipv4Addr) -> bool {
        self.reachable.contains(&address)
    }
}
