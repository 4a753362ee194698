// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 1-Wire device discovery through the kernel's device tree.
//!
//! The `w1` bus driver publishes one directory per attached device under
//! `/sys/bus/w1/devices`, named `<family>-<serial>`. MAX31850K converters use
//! family code `3b`.
//!
//! Discovery lists every matching directory, sorted by name, on each call.
//! It never truncates the result: limiting the number of reported sensors is
//! the job of [`ChannelAssignment`](crate::assignment::ChannelAssignment),
//! which keeps a sensor on the same channel even when other sensors come and
//! go.
//!
//! # Examples
//!
//! ```no_run
//! use max31850_monitor::discovery::{discover_devices, DiscoveryOptions};
//!
//! # async fn example() {
//! let devices = discover_devices(&DiscoveryOptions::new()).await;
//!
//! for device in &devices {
//!     println!("{} at {}", device.id(), device.path().display());
//! }
//! # }
//! ```

use std::path::{Path, PathBuf};

use crate::reading::{self, Reading};
use crate::types::DeviceId;

/// Default base directory of the 1-Wire device tree.
pub const DEFAULT_BASE_DIR: &str = "/sys/bus/w1/devices";

/// Family code prefix of MAX31850K devices.
pub const MAX31850_FAMILY_PREFIX: &str = "3b-";

/// Where and what to look for during discovery.
///
/// # Examples
///
/// ```
/// use max31850_monitor::discovery::DiscoveryOptions;
///
/// let options = DiscoveryOptions::new()
///     .with_base_dir("/tmp/w1")
///     .with_family_prefix("28-");
///
/// assert_eq!(options.family_prefix(), "28-");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    base_dir: PathBuf,
    family_prefix: String,
}

impl DiscoveryOptions {
    /// Creates options for MAX31850K devices under `/sys/bus/w1/devices`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory to scan.
    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Sets the directory name prefix devices must have.
    #[must_use]
    pub fn with_family_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.family_prefix = prefix.into();
        self
    }

    /// Returns the directory to scan.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the required name prefix.
    #[must_use]
    pub fn family_prefix(&self) -> &str {
        &self.family_prefix
    }
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            family_prefix: MAX31850_FAMILY_PREFIX.to_string(),
        }
    }
}

/// A device found during one discovery pass.
///
/// Handles are rebuilt on every call to [`discover_devices`]; only the
/// [`DeviceId`] is meant to outlive a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceHandle {
    id: DeviceId,
    path: PathBuf,
}

impl DeviceHandle {
    /// Creates a handle for the device directory at `path`.
    #[must_use]
    pub fn new(id: DeviceId, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            path: path.into(),
        }
    }

    /// Returns the device identifier.
    #[must_use]
    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    /// Returns the device directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the device's current temperature.
    pub async fn read(&self) -> Reading {
        reading::read_w1_slave(&self.path).await
    }
}

/// Lists the devices currently present under the configured base directory.
///
/// Returns every entry whose name starts with the family prefix, sorted by
/// identifier. A missing or unreadable base directory yields an empty list
/// rather than an error; the failure is logged.
pub async fn discover_devices(options: &DiscoveryOptions) -> Vec<DeviceHandle> {
    let base_dir = options.base_dir();

    let mut entries = match tokio::fs::read_dir(base_dir).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(
                base_dir = %base_dir.display(),
                error = %e,
                "Cannot list 1-Wire device directory"
            );
            return Vec::new();
        }
    };

    let mut devices = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(
                    base_dir = %base_dir.display(),
                    error = %e,
                    "Failed to read directory entry, stopping scan"
                );
                break;
            }
        };

        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let id = DeviceId::new(name);
        if !id.has_prefix(options.family_prefix()) {
            continue;
        }

        devices.push(DeviceHandle::new(id, entry.path()));
    }

    devices.sort_by(|a, b| a.id.cmp(&b.id));

    tracing::debug!(
        base_dir = %base_dir.display(),
        count = devices.len(),
        "Discovered 1-Wire devices"
    );

    devices
}
