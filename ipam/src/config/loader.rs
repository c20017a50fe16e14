//! Configuration file loading.

use std::fs;
use std::io;
use std::path::Path;

use crate::config::schema::Config;
use crate::config::validator::ConfigValidator;
use crate::error::{Error, Result};

/// Default location of the pool configuration, relative to the working
/// directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/ip-pools.yaml";

/// Loads the pool configuration file.
///
/// # Examples
///
/// ```no_run
/// use ipam::config::ConfigLoader;
/// use std::path::Path;
///
/// let config = ConfigLoader::load(Path::new("config/ip-pools.yaml")).unwrap();
/// println!("{} pools configured", config.pools.len());
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Read and parse a configuration file without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] if the file does not exist,
    /// [`Error::Io`] if it cannot be read, or [`Error::Configuration`] if
    /// it is not valid YAML for the schema.
    pub fn load(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::ConfigNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::Io(e)
            }
        })?;

        let config = Self::parse(&contents)?;
        log::debug!(
            "loaded {} pool(s) from {}",
            config.pools.len(),
            path.display()
        );
        Ok(config)
    }

    /// Read, parse and fully validate a configuration file.
    ///
    /// # Errors
    ///
    /// Everything [`ConfigLoader::load`] returns, plus
    /// [`Error::Validation`] / [`Error::InvalidCidr`] for invalid contents.
    pub fn load_validated(path: &Path) -> Result<Config> {
        let config = Self::load(path)?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Parse configuration text.
    ///
    /// Empty input is an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the YAML does not match the schema.
    pub fn parse(contents: &str) -> Result<Config> {
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ip-pools.yaml");
        let err = ConfigLoader::load(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_load_valid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ip-pools.yaml");
        fs::write(
            &path,
            "pools:\n  - name: rack-a\n    cidr: 10.0.0.0/24\n    gateway: 10.0.0.1\n",
        )
        .unwrap();

        let config = ConfigLoader::load_validated(&path).unwrap();
        assert_eq!(config.pools[0].name, "rack-a");
    }

    #[test]
    fn test_load_malformed_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ip-pools.yaml");
        fs::write(&path, "pools: [unclosed\n").unwrap();

        let err = ConfigLoader::load(&path).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_load_validated_rejects_bad_pool() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ip-pools.yaml");
        fs::write(
            &path,
            "pools:\n  - name: rack-a\n    cidr: 10.0.0.0/24\n    gateway: 10.9.9.1\n",
        )
        .unwrap();

        assert!(ConfigLoader::load(&path).is_ok());
        assert!(ConfigLoader::load_validated(&path).is_err());
    }

    #[test]
    fn test_parse_empty_is_default() {
        assert_eq!(ConfigLoader::parse("  \n").unwrap(), Config::default());
    }
}
