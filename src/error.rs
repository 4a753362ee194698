// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the monitor.
//!
//! Two families live here. [`ReadingError`] describes why a single sensor
//! produced no temperature during one poll cycle; it never escapes the cycle
//! and is reported in place of a value. [`Error`] covers process-level
//! failures, currently bad configuration. [`OutputError`] is raised by report
//! sinks; the monitor logs it and keeps polling.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The monitor configuration is invalid or could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Why a single device produced no temperature in a poll cycle.
///
/// The first three variants are data-format failures detected by
/// [`parse_w1_slave`](crate::reading::parse_w1_slave). [`Io`](Self::Io) is
/// raised by the caller that reads the record from disk.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReadingError {
    /// The driver did not mark the record's CRC as valid.
    #[error("CRC check failed")]
    CrcInvalid,

    /// The record has no `t=` field on its second line.
    #[error("temperature data not found")]
    TemperatureFieldMissing,

    /// The text after `t=` is not a base-10 integer.
    #[error("malformed temperature value: {0:?}")]
    MalformedNumber(String),

    /// The record could not be read from the filesystem.
    #[error("failed to read {path}: {message}")]
    Io {
        /// Path of the record that failed.
        path: PathBuf,
        /// Description of the underlying I/O failure.
        message: String,
    },
}

impl ReadingError {
    /// Builds an [`Io`](Self::Io) error from a filesystem failure.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Errors related to monitor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric setting is outside the allowed range.
    #[error("{field} = {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// The offending setting.
        field: &'static str,
        /// Minimum allowed value.
        min: u64,
        /// Maximum allowed value.
        max: u64,
        /// The value that was provided.
        actual: u64,
    },

    /// A required text setting is empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for this schema.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// Errors raised by report sinks.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Writing to the sink failed.
    #[error("failed to write {target}: {source}")]
    Write {
        /// Human-readable name of the sink target (a path or `stdout`).
        target: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
