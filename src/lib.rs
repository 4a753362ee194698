// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `max31850_monitor` - Poll MAX31850K thermocouple sensors over 1-Wire.
//!
//! The Linux `w1` subsystem exposes every sensor on the bus as a directory
//! under `/sys/bus/w1/devices`. This library scans that tree, gives each
//! sensor a stable channel number, decodes the driver's text records into
//! temperatures and hands the results of every poll cycle to report sinks
//! (console, CSV file).
//!
//! # Building Blocks
//!
//! - [`reading`]: parse a `w1_slave` record into a [`Temperature`]
//! - [`discovery`]: list the sensors present on the bus
//! - [`assignment`]: keep each sensor on the same channel across rescans
//! - [`Monitor`]: run the poll loop until asked to stop
//! - [`output`]: console and CSV sinks
//!
//! # Quick Start
//!
//! ```no_run
//! use max31850_monitor::output::ConsoleReporter;
//! use max31850_monitor::{Monitor, MonitorConfig};
//!
//! #[tokio::main]
//! async fn main() -> max31850_monitor::Result<()> {
//!     let config = MonitorConfig::default().without_csv();
//!     let mut monitor = Monitor::new(config)?.with_sink(ConsoleReporter::stdout());
//!
//!     // Runs one cycle; use `run` for the poll loop.
//!     let report = monitor.run_cycle().await;
//!     println!("{} sensor(s) read", report.ok_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Parsing a Record
//!
//! ```
//! use max31850_monitor::reading::parse_w1_slave;
//! use max31850_monitor::ReadingError;
//!
//! let ok = "72 01 ff ff f0 ff ff ff 64 : crc=64 YES\n72 01 ff ff f0 ff ff ff 64 t=24125\n";
//! assert_eq!(parse_w1_slave(ok).unwrap().celsius(), 24.125);
//!
//! let bad = "72 01 ff ff f0 ff ff ff 64 : crc=64 NO\nt=24125\n";
//! assert_eq!(parse_w1_slave(bad), Err(ReadingError::CrcInvalid));
//! ```

pub mod assignment;
pub mod config;
pub mod discovery;
pub mod error;
pub mod monitor;
pub mod output;
pub mod reading;
pub mod types;

pub use assignment::ChannelAssignment;
pub use config::MonitorConfig;
pub use discovery::{DeviceHandle, DiscoveryOptions, discover_devices};
pub use error::{ConfigError, Error, OutputError, ReadingError, Result};
pub use monitor::{ChannelReport, ChannelStatus, CycleReport, Monitor};
pub use output::{ConsoleReporter, CsvRecorder, ReportSink};
pub use reading::{Reading, parse_w1_slave};
pub use types::{Channel, DeviceId, Temperature};
