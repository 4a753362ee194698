// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sensor record reading and parsing.
//!
//! The `w1_therm` kernel driver exposes each MAX31850K as a directory whose
//! `w1_slave` file holds the last conversion as two lines of text:
//!
//! ```text
//! 72 01 ff ff f0 ff ff ff 64 : crc=64 YES
//! 72 01 ff ff f0 ff ff ff 64 t=24125
//! ```
//!
//! The first line ends with the driver's CRC verdict, the second carries the
//! temperature in milli-degrees Celsius after `t=`.
//!
//! # Examples
//!
//! ```
//! use max31850_monitor::reading::parse_w1_slave;
//!
//! let raw = "72 01 ff ff f0 ff ff ff 64 : crc=64 YES\n\
//!            72 01 ff ff f0 ff ff ff 64 t=24125\n";
//! let temperature = parse_w1_slave(raw).unwrap();
//! assert_eq!(temperature.celsius(), 24.125);
//! ```

mod parser;

pub use parser::parse_w1_slave;

use std::path::Path;

use crate::error::ReadingError;
use crate::types::Temperature;

/// Name of the record file inside a device directory.
pub const W1_SLAVE_FILE: &str = "w1_slave";

/// Outcome of reading one device during a poll cycle.
pub type Reading = Result<Temperature, ReadingError>;

/// Reads and parses the `w1_slave` record of the device at `device_dir`.
///
/// Filesystem failures are mapped to [`ReadingError::Io`]; content failures
/// come from [`parse_w1_slave`].
pub async fn read_w1_slave(device_dir: &Path) -> Reading {
    let path = device_dir.join(W1_SLAVE_FILE);

    let raw = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| ReadingError::io(&path, &e))?;

    tracing::trace!(path = %path.display(), raw = %raw.trim_end(), "Read sensor record");

    parse_w1_slave(&raw)
}
