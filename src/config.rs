// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Monitor configuration.
//!
//! Every setting has a default matching a Raspberry Pi with a six-port
//! MAX31850K board, so an empty JSON object is a valid configuration file.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use max31850_monitor::MonitorConfig;
//!
//! let config = MonitorConfig::default()
//!     .with_max_channels(4)
//!     .with_poll_interval(Duration::from_secs(5))
//!     .without_csv();
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.max_channels, 4);
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::discovery::{DEFAULT_BASE_DIR, DiscoveryOptions, MAX31850_FAMILY_PREFIX};
use crate::error::ConfigError;

/// Default number of thermocouple ports.
pub const DEFAULT_MAX_CHANNELS: u16 = 6;

/// Largest supported number of channels.
pub const MAX_CHANNELS_LIMIT: u16 = 64;

/// Default delay between two poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default location of the CSV log.
pub const DEFAULT_CSV_PATH: &str = "data/temperature_readings.csv";

/// Settings for a [`Monitor`](crate::Monitor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Directory holding the 1-Wire device entries.
    pub base_dir: PathBuf,
    /// Directory name prefix selecting MAX31850K devices.
    pub family_prefix: String,
    /// Number of channels, and of temperature columns in the CSV log.
    pub max_channels: u16,
    /// Delay between two poll cycles.
    #[serde(rename = "poll_interval_ms", with = "duration_ms")]
    pub poll_interval: Duration,
    /// CSV log file, or `None` to disable CSV output.
    pub csv_path: Option<PathBuf>,
}

impl MonitorConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid JSON for this schema.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Sets the 1-Wire device directory.
    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Sets the device name prefix.
    #[must_use]
    pub fn with_family_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.family_prefix = prefix.into();
        self
    }

    /// Sets the number of channels.
    #[must_use]
    pub fn with_max_channels(mut self, max_channels: u16) -> Self {
        self.max_channels = max_channels;
        self
    }

    /// Sets the delay between poll cycles.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the CSV log file.
    #[must_use]
    pub fn with_csv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv_path = Some(path.into());
        self
    }

    /// Disables CSV output.
    #[must_use]
    pub fn without_csv(mut self) -> Self {
        self.csv_path = None;
        self
    }

    /// Returns the discovery options derived from this configuration.
    #[must_use]
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions::new()
            .with_base_dir(&self.base_dir)
            .with_family_prefix(&self.family_prefix)
    }

    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] if `max_channels` is not in
    /// `1..=64` or the poll interval is zero, and [`ConfigError::Empty`] if
    /// the family prefix is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_CHANNELS_LIMIT).contains(&self.max_channels) {
            return Err(ConfigError::OutOfRange {
                field: "max_channels",
                min: 1,
                max: u64::from(MAX_CHANNELS_LIMIT),
                actual: u64::from(self.max_channels),
            });
        }

        if self.poll_interval.is_zero() {
            return Err(ConfigError::OutOfRange {
                field: "poll_interval_ms",
                min: 1,
                max: u64::MAX,
                actual: 0,
            });
        }

        if self.family_prefix.is_empty() {
            return Err(ConfigError::Empty("family_prefix"));
        }

        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            family_prefix: MAX31850_FAMILY_PREFIX.to_string(),
            max_channels: DEFAULT_MAX_CHANNELS,
            poll_interval: DEFAULT_POLL_INTERVAL,
            csv_path: Some(PathBuf::from(DEFAULT_CSV_PATH)),
        }
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.base_dir, PathBuf::from("/sys/bus/w1/devices"));
        assert_eq!(config.family_prefix, "3b-");
        assert_eq!(config.max_channels, 6);
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(
            config.csv_path,
            Some(PathBuf::from("data/temperature_readings.csv"))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_channels() {
        let err = MonitorConfig::default()
            .with_max_channels(0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "max_channels",
                ..
            }
        ));
    }

    #[test]
    fn rejects_too_many_channels() {
        assert!(MonitorConfig::default().with_max_channels(64).validate().is_ok());
        assert!(MonitorConfig::default().with_max_channels(65).validate().is_err());
    }

    #[test]
    fn rejects_zero_interval() {
        let config = MonitorConfig::default().with_poll_interval(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_prefix() {
        let err = MonitorConfig::default()
            .with_family_prefix("")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Empty("family_prefix")));
    }

    #[test]
    fn empty_json_gives_defaults() {
        let config: MonitorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, MonitorConfig::default());
    }

    #[test]
    fn partial_json_overrides() {
        let json = r#"{"base_dir":"/tmp/w1","max_channels":3,"poll_interval_ms":500,"csv_path":null}"#;
        let config: MonitorConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.base_dir, PathBuf::from("/tmp/w1"));
        assert_eq!(config.max_channels, 3);
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.csv_path, None);
        assert_eq!(config.family_prefix, "3b-");
    }

    #[test]
    fn serializes_interval_in_milliseconds() {
        let json = serde_json::to_value(MonitorConfig::default()).unwrap();
        assert_eq!(json["poll_interval_ms"], 2000);
    }

    #[test]
    fn from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.json");
        std::fs::write(&path, r#"{"family_prefix":"28-"}"#).unwrap();

        let config = MonitorConfig::from_json_file(&path).unwrap();
        assert_eq!(config.family_prefix, "28-");
    }

    #[test]
    fn from_json_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            MonitorConfig::from_json_file(&missing),
            Err(ConfigError::Read { .. })
        ));

        let invalid = dir.path().join("invalid.json");
        std::fs::write(&invalid, "{ not json").unwrap();
        assert!(matches!(
            MonitorConfig::from_json_file(&invalid),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn discovery_options_follow_config() {
        let options = MonitorConfig::default()
            .with_base_dir("/tmp/w1")
            .with_family_prefix("28-")
            .discovery_options();

        assert_eq!(options.base_dir(), Path::new("/tmp/w1"));
        assert_eq!(options.family_prefix(), "28-");
    }
}
