// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Destinations for cycle reports.
//!
//! A [`Monitor`](crate::Monitor) hands each [`CycleReport`] to every
//! registered [`ReportSink`]. Two sinks are provided:
//!
//! - [`ConsoleReporter`] - human-readable lines, one per channel
//! - [`CsvRecorder`] - one CSV row per cycle, appended to a file

mod console;
mod csv;

pub use console::{ConsoleReporter, format_banner};
pub use csv::CsvRecorder;

use crate::error::OutputError;
use crate::monitor::CycleReport;

/// Token written in place of a temperature for a failed or empty channel.
pub const ERROR_TOKEN: &str = "ERROR";

/// Receiver of cycle reports.
///
/// Implementations must not assume anything about the number of channels
/// that actually produced a value: failed and empty channels are part of
/// every report.
pub trait ReportSink: Send {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// Records one cycle.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] if the report could not be written. The
    /// monitor logs the failure and keeps polling.
    fn report(&mut self, report: &CycleReport) -> Result<(), OutputError>;
}
