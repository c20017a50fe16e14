//! Delivery reports for hosts that passed validation.

use std::fs;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::error::Result;

/// Directory reports are written to when none is given.
pub const DEFAULT_REPORTS_DIR: &str = "reports";

/// Outcome recorded in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    /// The host answered the reachability probe.
    Ready,
}

/// The JSON document written for a validated host.
///
/// # Examples
///
/// ```
/// use ipam::report::DeliveryReport;
/// use std::net::Ipv4Addr;
///
/// let report = DeliveryReport::new(Ipv4Addr::new(10, 0, 0, 2));
/// let json = serde_json::to_value(&report).unwrap();
/// assert_eq!(json["status"], "READY");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    /// The validated address.
    pub ip: Ipv4Addr,
    /// Validation outcome.
    pub status: ReportStatus,
    /// When validation succeeded.
    #[serde(serialize_with = "rfc3339_seconds")]
    pub timestamp: DateTime<Utc>,
}

fn rfc3339_seconds<S>(value: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
}

impl DeliveryReport {
    /// A READY report for `ip`, stamped now.
    #[must_use]
    pub fn new(ip: Ipv4Addr) -> Self {
        Self::at(ip, Utc::now())
    }

    /// A READY report for `ip` with an explicit timestamp.
    #[must_use]
    pub const fn at(ip: Ipv4Addr, timestamp: DateTime<Utc>) -> Self {
        Self {
            ip,
            status: ReportStatus::Ready,
            timestamp,
        }
    }

    /// Where this report lives inside `dir`: `<dir>/<ip>.json`.
    #[must_use]
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.json", self.ip))
    }

    /// Write the report into `dir`, creating the directory if needed.
    ///
    /// An existing report for the same address is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the directory or file
    /// cannot be written.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = self.path_in(dir);
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        fs::write(&path, bytes)?;
        log::debug!("wrote delivery report {}", path.display());
        Ok(path)
    }
}
