//! Pool configuration for ipam.
//!
//! The configuration is a YAML file listing the address pools along with a
//! few optional ledger settings. It is loaded once per invocation and never
//! modified by the library.
//!
//! # Examples
//!
//! ```
//! use ipam::config::ConfigLoader;
//!
//! let config = ConfigLoader::parse(
//!     r"
//! pools:
//!   - name: rack-a
//!     cidr: 10.0.0.0/24
//!     gateway: 10.0.0.1
//!     dns: [1.1.1.1]
//!     reserved: [10.0.0.1]
//! ",
//! )
//! .unwrap();
//!
//! let pool = config.pool(Some("rack-a")).unwrap();
//! assert_eq!(pool.cidr, "10.0.0.0/24");
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{ConfigLoader, DEFAULT_CONFIG_PATH};
pub use schema::{Config, Pool};
pub use validator::ConfigValidator;
