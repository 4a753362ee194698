// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temperature value type.

use std::fmt;

/// A temperature in degrees Celsius.
///
/// The MAX31850K driver reports milli-degrees; the full precision is kept
/// here and only rounded on display, which always uses two decimals.
///
/// # Examples
///
/// ```
/// use max31850_monitor::types::Temperature;
///
/// let t = Temperature::from_millidegrees(24125);
/// assert_eq!(t.celsius(), 24.125);
/// assert_eq!(Temperature::from_millidegrees(21437).to_string(), "21.44");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Temperature(f64);

impl Temperature {
    /// Creates a temperature from an integer number of milli-degrees Celsius.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_millidegrees(milli: i64) -> Self {
        Self(milli as f64 / 1000.0)
    }

    /// Returns the value in degrees Celsius.
    #[must_use]
    pub const fn celsius(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
