// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 1-Wire device identifier type.

use std::fmt;

/// Identifier of a 1-Wire device, as named by the kernel driver.
///
/// The identifier is the directory name under the bus' device tree, made of
/// a family code and a serial number (`3b-` is the MAX31850K family).
/// Equality and ordering are plain string comparisons.
///
/// # Examples
///
/// ```
/// use max31850_monitor::types::DeviceId;
///
/// let id = DeviceId::new("3b-0000001a2b3c");
/// assert_eq!(id.as_str(), "3b-0000001a2b3c");
/// assert!(id.has_prefix("3b-"));
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    /// Creates an identifier from a device directory name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the identifier starts with the given prefix.
    #[must_use]
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceId({})", self.0)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for DeviceId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_exact() {
        assert_eq!(DeviceId::new("3b-0001"), DeviceId::from("3b-0001"));
        assert_ne!(DeviceId::new("3b-0001"), DeviceId::new("3B-0001"));
        assert_ne!(DeviceId::new("3b-0001"), DeviceId::new("3b-0001 "));
    }

    #[test]
    fn ordering_is_lexicographic() {
        let mut ids = vec![
            DeviceId::new("3b-00b"),
            DeviceId::new("3b-00a"),
            DeviceId::new("3b-0010"),
        ];
        ids.sort();
        let names: Vec<_> = ids.iter().map(DeviceId::as_str).collect();
        assert_eq!(names, ["3b-0010", "3b-00a", "3b-00b"]);
    }

    #[test]
    fn has_prefix() {
        let id = DeviceId::new("3b-0000001a2b3c");
        assert!(id.has_prefix("3b-"));
        assert!(!id.has_prefix("28-"));
    }

    #[test]
    fn display_and_debug_format() {
        let id = DeviceId::new("3b-0001");
        assert_eq!(id.to_string(), "3b-0001");
        assert_eq!(format!("{id:?}"), "DeviceId(3b-0001)");
    }
}
