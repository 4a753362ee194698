// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CSV log of cycle reports.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{ERROR_TOKEN, ReportSink};
use crate::error::OutputError;
use crate::monitor::{ChannelReport, CycleReport};
use crate::types::Channel;

/// Appends one row per cycle to a CSV file.
///
/// The header `timestamp,temp1,...,tempN` is written only when the file does
/// not exist yet, so restarting the monitor keeps appending to the same log.
/// Each row holds the cycle timestamp (ISO-8601 UTC, milliseconds) and one
/// field per channel: the temperature with two decimals, or `ERROR`.
///
/// ```text
/// timestamp,temp1,temp2,temp3
/// 2024-05-01T12:00:00.123Z,24.13,ERROR,ERROR
/// ```
///
/// Writes are synchronous: each row is appended with `std::fs` from the poll
/// loop, which runs one cycle at a time and sleeps for most of each interval.
#[derive(Debug, Clone)]
pub struct CsvRecorder {
    path: PathBuf,
    columns: u16,
}

impl CsvRecorder {
    /// Creates a recorder for `columns` temperature columns.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, columns: u16) -> Self {
        Self {
            path: path.into(),
            columns,
        }
    }

    /// Returns the CSV file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the header line, without line terminator.
    #[must_use]
    pub fn header(&self) -> String {
        let mut fields = vec!["timestamp".to_string()];
        fields.extend(Channel::range(self.columns).map(|c| format!("temp{c}")));
        fields.join(",")
    }

    /// Returns the row for `report`, without line terminator.
    #[must_use]
    pub fn row(&self, report: &CycleReport) -> String {
        let mut fields = vec![report.timestamp_iso()];
        fields.extend(Channel::range(self.columns).map(|channel| {
            report
                .channel(channel)
                .and_then(ChannelReport::temperature)
                .map_or_else(|| ERROR_TOKEN.to_string(), |t| t.to_string())
        }));
        fields.join(",")
    }

    fn append(&self, report: &CycleReport) -> io::Result<()> {
        let exists = self.path.try_exists()?;

        if !exists {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            tracing::info!(path = %self.path.display(), "Creating CSV log");
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut buf = String::new();
        if !exists {
            buf.push_str(&self.header());
            buf.push('\n');
        }
        buf.push_str(&self.row(report));
        buf.push('\n');

        file.write_all(buf.as_bytes())
    }
}

impl ReportSink for CsvRecorder {
    fn name(&self) -> &str {
        "csv"
    }

    fn report(&mut self, report: &CycleReport) -> Result<(), OutputError> {
        self.append(report).map_err(|source| OutputError::Write {
            target: self.path.display().to_string(),
            source,
        })
    }
}
