// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Human-readable console output.

use std::fmt::Write as _;
use std::io::{self, Write};

use super::{ERROR_TOKEN, ReportSink};
use crate::discovery::DeviceHandle;
use crate::error::OutputError;
use crate::monitor::{ChannelStatus, CycleReport};
use crate::types::Channel;

/// Width of the separator printed after each cycle.
const SEPARATOR_WIDTH: usize = 40;

/// Prints one line per channel followed by a separator.
///
/// ```text
/// Port 1 (3b-0000001a2b3c): 24.13 °C
/// Port 2 (3b-0000001a2b3d): ERROR (CRC check failed)
/// Port 3: not connected
/// ----------------------------------------
/// ```
pub struct ConsoleReporter<W> {
    out: W,
    target: String,
}

impl ConsoleReporter<io::Stdout> {
    /// Creates a reporter writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout(), "stdout")
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Creates a reporter writing to `out`.
    #[must_use]
    pub fn new(out: W, target: impl Into<String>) -> Self {
        Self {
            out,
            target: target.into(),
        }
    }

    /// Returns the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_report(&mut self, report: &CycleReport) -> io::Result<()> {
        for channel in report.channels() {
            let port = channel.channel();
            match channel.status() {
                ChannelStatus::Reading {
                    device,
                    reading: Ok(temperature),
                } => writeln!(self.out, "Port {port} ({device}): {temperature} °C")?,
                ChannelStatus::Reading {
                    device,
                    reading: Err(e),
                } => writeln!(self.out, "Port {port} ({device}): {ERROR_TOKEN} ({e})")?,
                ChannelStatus::NotConnected => writeln!(self.out, "Port {port}: not connected")?,
            }
        }
        writeln!(self.out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        self.out.flush()
    }
}

impl<W: Write + Send> ReportSink for ConsoleReporter<W> {
    fn name(&self) -> &str {
        &self.target
    }

    fn report(&mut self, report: &CycleReport) -> Result<(), OutputError> {
        self.write_report(report).map_err(|source| OutputError::Write {
            target: self.target.clone(),
            source,
        })
    }
}

/// Formats the startup summary of discovered ports.
///
/// `present` holds the devices found at startup with their channel;
/// channels up to `max_channels` without a device are listed as not found.
#[must_use]
pub fn format_banner(present: &[(Channel, DeviceHandle)], max_channels: u16) -> String {
    let mut banner = format!(
        "Discovered {} of {max_channels} thermocouple port(s):\n",
        present.len()
    );

    let mut missing = Vec::new();
    for channel in Channel::range(max_channels) {
        match present.iter().find(|(c, _)| *c == channel) {
            Some((_, handle)) => {
                let _ = writeln!(banner, "  Port {channel}: {}", handle.id());
            }
            None => missing.push(channel.value()),
        }
    }

    match missing.as_slice() {
        [] => {}
        [single] => {
            let _ = writeln!(banner, "  Port {single}: not found");
        }
        [first, .., last] if usize::from(last - first) + 1 == missing.len() => {
            let _ = writeln!(banner, "  Ports {first}-{last}: not found");
        }
        ports => {
            let list: Vec<String> = ports.iter().map(ToString::to_string).collect();
            let _ = writeln!(banner, "  Ports {}: not found", list.join(", "));
        }
    }

    banner
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::error::ReadingError;
    use crate::monitor::ChannelReport;
    use crate::types::{DeviceId, Temperature};

    fn handle(name: &str) -> DeviceHandle {
        DeviceHandle::new(DeviceId::new(name), format!("/sys/bus/w1/devices/{name}"))
    }

    fn channel(n: u16) -> Channel {
        Channel::new(n).unwrap()
    }

    #[test]
    fn prints_each_channel_and_separator() {
        let report = CycleReport::new(
            Utc::now(),
            vec![
                ChannelReport::new(
                    channel(1),
                    ChannelStatus::Reading {
                        device: DeviceId::new("3b-01"),
                        reading: Ok(Temperature::from_millidegrees(24130)),
                    },
                ),
                ChannelReport::new(
                    channel(2),
                    ChannelStatus::Reading {
                        device: DeviceId::new("3b-02"),
                        reading: Err(ReadingError::TemperatureFieldMissing),
                    },
                ),
                ChannelReport::new(channel(3), ChannelStatus::NotConnected),
            ],
        );

        let mut console = ConsoleReporter::new(Vec::new(), "buffer");
        console.report(&report).unwrap();
        let text = String::from_utf8(console.into_inner()).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "Port 1 (3b-01): 24.13 °C",
                "Port 2 (3b-02): ERROR (temperature data not found)",
                "Port 3: not connected",
                "----------------------------------------",
            ]
        );
    }

    #[test]
    fn banner_all_found() {
        let banner = format_banner(&[(channel(1), handle("3b-a")), (channel(2), handle("3b-b"))], 2);
        assert_eq!(
            banner,
            "Discovered 2 of 2 thermocouple port(s):\n  Port 1: 3b-a\n  Port 2: 3b-b\n"
        );
    }

    #[test]
    fn banner_trailing_range_not_found() {
        let banner = format_banner(&[(channel(1), handle("3b-a"))], 6);
        assert!(banner.starts_with("Discovered 1 of 6 thermocouple port(s):\n"));
        assert!(banner.ends_with("  Ports 2-6: not found\n"));
    }

    #[test]
    fn banner_single_port_not_found() {
        let banner = format_banner(&[(channel(1), handle("3b-a"))], 2);
        assert!(banner.ends_with("  Port 2: not found\n"));
    }

    #[test]
    fn banner_scattered_ports_not_found() {
        let banner = format_banner(&[(channel(2), handle("3b-b"))], 4);
        assert!(banner.ends_with("  Ports 1, 3, 4: not found\n"));
    }

    #[test]
    fn banner_nothing_found() {
        let banner = format_banner(&[], 3);
        assert_eq!(
            banner,
            "Discovered 0 of 3 thermocouple port(s):\n  Ports 1-3: not found\n"
        );
    }
}
