//! Error types for the ipam library.
//!
//! Every fallible operation in the library returns [`Result`], so callers
//! decide whether a failure aborts the invocation, is logged, or is retried.
//! The variants fall into three groups, exposed through
//! [`Error::is_configuration_error`], [`Error::is_state_error`] and
//! [`Error::is_domain_error`].

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for operations that may fail with an ipam error.
///
/// # Examples
///
/// ```
/// use ipam::{Error, Result};
///
/// fn example_operation() -> Result<u8> {
///     Ok(24)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the ipam library.
#[derive(Debug, Error)]
pub enum Error {
    /// A pool's CIDR block could not be parsed.
    #[error("invalid CIDR '{cidr}': {reason}")]
    InvalidCidr {
        /// The CIDR text as configured.
        cidr: String,
        /// The reason the CIDR is invalid.
        reason: String,
    },

    /// A supplied address could not be parsed as an IPv4 address.
    #[error("invalid address '{value}': {reason}")]
    InvalidAddress {
        /// The text that failed to parse.
        value: String,
        /// The reason the address is invalid.
        reason: String,
    },

    /// No eligible address remains in the pool.
    #[error("pool '{pool}' ({cidr}) has no free addresses")]
    PoolExhausted {
        /// The exhausted pool.
        pool: String,
        /// The pool's CIDR block.
        cidr: String,
    },

    /// An address lies outside the pool's CIDR block.
    #[error("address {address} does not belong to pool '{pool}' ({cidr})")]
    AddressNotInPool {
        /// The offending address.
        address: Ipv4Addr,
        /// The pool the address was checked against.
        pool: String,
        /// The pool's CIDR block.
        cidr: String,
    },

    /// Release was requested for an address that is not currently assigned.
    #[error("address {address} is not currently assigned in pool '{pool}'")]
    NotAssigned {
        /// The address that was not found in the ledger.
        address: Ipv4Addr,
        /// The pool whose ledger was searched.
        pool: String,
    },

    /// The requested pool is not defined in the configuration.
    #[error("pool '{name}' not found in configuration")]
    UnknownPool {
        /// The requested pool name.
        name: String,
    },

    /// The configuration defines no pools at all.
    #[error("no IP pools defined in configuration")]
    NoPools,

    /// The configuration file does not exist.
    #[error("configuration file not found: {}", path.display())]
    ConfigNotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A configuration value failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The ledger file has content that cannot be decoded.
    #[error("corrupt ledger {}: {details}", path.display())]
    CorruptLedger {
        /// The ledger file.
        path: PathBuf,
        /// What the decoder rejected.
        details: String,
    },

    /// The ledger could not be durably written.
    #[error("failed to persist ledger {}: {source}", path.display())]
    PersistFailure {
        /// The ledger file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The ledger lock was not obtained within the configured wait.
    #[error("ledger {} is locked; gave up after {}s", path.display(), waited.as_secs_f64())]
    LockUnavailable {
        /// The lock file that was contended.
        path: PathBuf,
        /// How long acquisition was attempted.
        waited: Duration,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON encoding error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Check if the error stems from configuration (caller's responsibility,
    /// not worth retrying).
    ///
    /// # Examples
    ///
    /// ```
    /// use ipam::Error;
    ///
    /// let err = Error::UnknownPool { name: "rack-z".into() };
    /// assert!(err.is_configuration_error());
    /// ```
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCidr { .. }
                | Self::UnknownPool { .. }
                | Self::NoPools
                | Self::ConfigNotFound { .. }
                | Self::Configuration(_)
                | Self::Validation { .. }
        )
    }

    /// Check if the error concerns the durable ledger state.
    ///
    /// These abort the invocation and usually need an operator.
    ///
    /// # Examples
    ///
    /// ```
    /// use ipam::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::CorruptLedger {
    ///     path: PathBuf::from("/var/lib/ipam/assigned.json"),
    ///     details: "expected value".into(),
    /// };
    /// assert!(err.is_state_error());
    /// ```
    #[must_use]
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            Self::CorruptLedger { .. }
                | Self::PersistFailure { .. }
                | Self::LockUnavailable { .. }
                | Self::Io(_)
                | Self::Json(_)
        )
    }

    /// Check if the error is a domain outcome reported back to the caller,
    /// such as an exhausted pool or a double release.
    ///
    /// # Examples
    ///
    /// ```
    /// use ipam::Error;
    ///
    /// let err = Error::PoolExhausted {
    ///     pool: "rack-a".into(),
    ///     cidr: "10.0.0.0/30".into(),
    /// };
    /// assert!(err.is_domain_error());
    /// ```
    #[must_use]
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            Self::PoolExhausted { .. }
                | Self::AddressNotInPool { .. }
                | Self::NotAssigned { .. }
                | Self::InvalidAddress { .. }
        )
    }
}
