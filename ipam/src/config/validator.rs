//! Configuration validation.
//!
//! Loading only checks that the YAML has the right shape; this module checks
//! that the values make sense as network settings.

use std::collections::HashSet;

use crate::config::schema::{Config, Pool};
use crate::error::{Error, Result};
use crate::pool::{parse_address, HostRange};

/// Validates pool configuration.
///
/// # Examples
///
/// ```
/// use ipam::config::{Config, ConfigValidator, Pool};
///
/// let config = Config {
///     pools: vec![Pool::new("rack-a", "10.0.0.0/24").with_gateway("10.0.0.1")],
///     ..Default::default()
/// };
/// ConfigValidator::validate(&config).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: no pools, duplicate or malformed
    /// names, a zero lock timeout, or any error from
    /// [`ConfigValidator::validate_pool`].
    pub fn validate(config: &Config) -> Result<()> {
        if config.pools.is_empty() {
            return Err(Error::NoPools);
        }

        if config.lock_timeout_seconds == Some(0) {
            return Err(Error::Validation {
                field: "lock_timeout_seconds".into(),
                message: "Timeout must be greater than 0".into(),
            });
        }

        let mut seen = HashSet::new();
        for pool in &config.pools {
            Self::validate_pool(pool)?;
            if !seen.insert(pool.name.as_str()) {
                return Err(Error::Validation {
                    field: "pools".into(),
                    message: format!("duplicate pool name '{}'", pool.name),
                });
            }
        }

        Ok(())
    }

    /// Validate a single pool definition.
    ///
    /// Reserved entries outside the block are accepted (they can never
    /// collide with an allocation) but logged as warnings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCidr`] for a malformed block and
    /// [`Error::Validation`] for a bad name, gateway, DNS or reserved entry.
    pub fn validate_pool(pool: &Pool) -> Result<()> {
        Self::validate_name(&pool.name)?;
        let range = HostRange::parse(&pool.cidr)?;
        let field = |suffix: &str| format!("pools.{}.{suffix}", pool.name);

        if range.is_empty() {
            log::warn!(
                "pool '{}' ({range}) has no host addresses and can never allocate",
                pool.name
            );
        }

        if pool.gateway.trim().is_empty() {
            return Err(Error::Validation {
                field: field("gateway"),
                message: "Gateway is required".into(),
            });
        }
        let gateway = parse_address(&pool.gateway).map_err(|e| Error::Validation {
            field: field("gateway"),
            message: e.to_string(),
        })?;
        if !range.contains_host(gateway) {
            return Err(Error::Validation {
                field: field("gateway"),
                message: format!("{gateway} is not a host address of {range}"),
            });
        }

        for server in &pool.dns {
            parse_address(server).map_err(|e| Error::Validation {
                field: field("dns"),
                message: e.to_string(),
            })?;
        }

        for entry in &pool.reserved {
            let address = parse_address(entry).map_err(|e| Error::Validation {
                field: field("reserved"),
                message: e.to_string(),
            })?;
            if !range.contains(address) {
                log::warn!(
                    "pool '{}': reserved address {address} lies outside {range}",
                    pool.name
                );
            }
        }

        Ok(())
    }

    /// Pool names must be non-empty after trimming, contain no null bytes,
    /// and be at most 255 characters.
    fn validate_name(name: &str) -> Result<()> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(Error::Validation {
                field: "pools.name".into(),
                message: "Cannot be empty or only whitespace".into(),
            });
        }

        if trimmed.contains('\0') {
            return Err(Error::Validation {
                field: "pools.name".into(),
                message: "Cannot contain null bytes".into(),
            });
        }

        if trimmed.len() > 255 {
            return Err(Error::Validation {
                field: "pools.name".into(),
                message: "Cannot exceed 255 characters".into(),
            });
        }

        Ok(())
    }
}
