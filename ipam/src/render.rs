//! Cloud-init network configuration rendering.

use std::fmt::Write;
use std::net::Ipv4Addr;

use crate::operations::Allocation;

/// Interface name used when none is given.
pub const DEFAULT_INTERFACE: &str = "eth0";

/// Static network settings for one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Interface name, e.g. `eth0`.
    pub interface: String,
    /// The interface address.
    pub address: Ipv4Addr,
    /// Prefix length of the attached network.
    pub prefix_len: u8,
    /// Default gateway.
    pub gateway: String,
    /// DNS servers in order of preference.
    pub dns: Vec<String>,
}

impl NetworkConfig {
    /// Settings for `allocation` on `interface`.
    #[must_use]
    pub fn from_allocation(allocation: &Allocation, interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            address: allocation.ip,
            prefix_len: allocation.prefix_len,
            gateway: allocation.gateway.clone(),
            dns: allocation.dns.clone(),
        }
    }
}

/// Render a cloud-init network config (version 2) with DHCP disabled.
///
/// # Examples
///
/// ```
/// use ipam::render::{cloud_init_network, NetworkConfig};
/// use std::net::Ipv4Addr;
///
/// let text = cloud_init_network(&NetworkConfig {
///     interface: "eth0".into(),
///     address: Ipv4Addr::new(10, 0, 0, 2),
///     prefix_len: 24,
///     gateway: "10.0.0.1".into(),
///     dns: vec!["1.1.1.1".into()],
/// });
/// assert!(text.starts_with("#cloud-config\n"));
/// assert!(text.contains("        - 10.0.0.2/24\n"));
/// ```
#[must_use]
pub fn cloud_init_network(config: &NetworkConfig) -> String {
    let mut out = String::from("#cloud-config\nnetwork:\n  version: 2\n  ethernets:\n");
    // Writing to a String cannot fail.
    let _ = writeln!(out, "    {}:", config.interface);
    out.push_str("      dhcp4: false\n      addresses:\n");
    let _ = writeln!(out, "        - {}/{}", config.address, config.prefix_len);
    let _ = writeln!(out, "      gateway4: {}", config.gateway);
    out.push_str("      nameservers:\n");
    let _ = writeln!(out, "        addresses: [{}]", config.dns.join(", "));
    out
}
