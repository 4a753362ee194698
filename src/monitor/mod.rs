// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Poll loop tying discovery, channel assignment and reading together.
//!
//! A [`Monitor`] owns the [`ChannelAssignment`] for its whole lifetime. Each
//! cycle it rescans the device tree, updates the assignment, reads every
//! present device one after the other and hands a [`CycleReport`] to its
//! sinks. A failing sensor only affects its own channel in that cycle.
//!
//! # Examples
//!
//! ```no_run
//! use max31850_monitor::output::{ConsoleReporter, CsvRecorder};
//! use max31850_monitor::{Monitor, MonitorConfig};
//!
//! #[tokio::main]
//! async fn main() -> max31850_monitor::Result<()> {
//!     let config = MonitorConfig::default();
//!     let csv = CsvRecorder::new("data/temperature_readings.csv", config.max_channels);
//!
//!     let mut monitor = Monitor::new(config)?
//!         .with_sink(ConsoleReporter::stdout())
//!         .with_sink(csv);
//!
//!     let (stop, shutdown) = tokio::sync::watch::channel(false);
//!     tokio::spawn(async move {
//!         let _ = tokio::signal::ctrl_c().await;
//!         let _ = stop.send(true);
//!     });
//!
//!     monitor.run(shutdown).await;
//!     Ok(())
//! }
//! ```

mod report;

pub use report::{ChannelReport, ChannelStatus, CycleReport};

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::watch;

use crate::assignment::ChannelAssignment;
use crate::config::MonitorConfig;
use crate::discovery::{self, DeviceHandle, DiscoveryOptions};
use crate::error::ConfigError;
use crate::output::{ReportSink, format_banner};
use crate::types::{Channel, DeviceId};

/// Periodic poller for MAX31850K sensors.
pub struct Monitor {
    config: MonitorConfig,
    discovery: DiscoveryOptions,
    assignment: ChannelAssignment,
    sinks: Vec<Box<dyn ReportSink>>,
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("config", &self.config)
            .field("assignment", &self.assignment)
            .field("sinks", &self.sinks.iter().map(|s| s.name()).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Monitor {
    /// Creates a monitor with no sinks.
    ///
    /// # Errors
    ///
    /// Returns the validation error if `config` is not usable.
    pub fn new(config: MonitorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            discovery: config.discovery_options(),
            assignment: ChannelAssignment::new(config.max_channels),
            config,
            sinks: Vec::new(),
        })
    }

    /// Adds a sink that receives every cycle report.
    #[must_use]
    pub fn with_sink(mut self, sink: impl ReportSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Returns the channel assignment built so far.
    #[must_use]
    pub fn assignment(&self) -> &ChannelAssignment {
        &self.assignment
    }

    /// Rescans the device tree, updates the channel assignment and returns
    /// the present devices that have a channel, in channel order.
    pub async fn discover(&mut self) -> Vec<(Channel, DeviceHandle)> {
        let handles = discovery::discover_devices(&self.discovery).await;
        let ids: Vec<DeviceId> = handles.iter().map(|h| h.id().clone()).collect();

        let mut by_id: HashMap<DeviceId, DeviceHandle> = handles
            .into_iter()
            .map(|handle| (handle.id().clone(), handle))
            .collect();

        self.assignment
            .assign(&ids)
            .into_iter()
            .filter_map(|(channel, id)| by_id.remove(&id).map(|handle| (channel, handle)))
            .collect()
    }

    /// Runs an initial discovery and returns the summary of found and
    /// missing ports, as printed at startup.
    ///
    /// Devices found here are assigned their channels, so the banner and the
    /// first cycle agree on the port numbers.
    pub async fn startup_banner(&mut self) -> String {
        let present = self.discover().await;
        format_banner(&present, self.config.max_channels)
    }

    /// Runs one cycle without notifying the sinks.
    ///
    /// Every configured channel appears in the report, as a reading or as
    /// [`ChannelStatus::NotConnected`].
    pub async fn poll_once(&mut self) -> CycleReport {
        let timestamp = Utc::now();
        let mut present: HashMap<Channel, DeviceHandle> = self.discover().await.into_iter().collect();

        let mut channels = Vec::with_capacity(usize::from(self.config.max_channels));
        for channel in Channel::range(self.config.max_channels) {
            let status = match present.remove(&channel) {
                Some(handle) => {
                    let reading = handle.read().await;
                    match &reading {
                        Ok(temperature) => tracing::debug!(
                            channel = channel.value(),
                            device = %handle.id(),
                            celsius = temperature.celsius(),
                            "Read temperature"
                        ),
                        Err(e) => tracing::warn!(
                            channel = channel.value(),
                            device = %handle.id(),
                            error = %e,
                            "Failed to read sensor"
                        ),
                    }
                    ChannelStatus::Reading {
                        device: handle.id().clone(),
                        reading,
                    }
                }
                None => ChannelStatus::NotConnected,
            };
            channels.push(ChannelReport::new(channel, status));
        }

        CycleReport::new(timestamp, channels)
    }

    /// Runs one cycle and delivers the report to every sink.
    ///
    /// A sink that fails is logged and skipped; the other sinks still
    /// receive the report.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let report = self.poll_once().await;

        for sink in &mut self.sinks {
            if let Err(e) = sink.report(&report) {
                tracing::error!(sink = sink.name(), error = %e, "Failed to record cycle");
            }
        }

        report
    }

    /// Polls until `shutdown` becomes `true` or its sender is dropped.
    ///
    /// The signal is checked before each cycle and while sleeping between
    /// cycles, so a running cycle always completes.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            base_dir = %self.config.base_dir.display(),
            channels = self.config.max_channels,
            interval_ms = u64::try_from(self.config.poll_interval.as_millis()).unwrap_or(u64::MAX),
            "Starting poll loop"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let report = self.run_cycle().await;
            tracing::debug!(
                ok = report.ok_count(),
                errors = report.error_count(),
                "Poll cycle completed"
            );

            tokio::select! {
                () = tokio::time::sleep(self.config.poll_interval) => {}
                _ = shutdown.wait_for(|stop| *stop) => break,
            }
        }

        tracing::info!("Poll loop stopped");
    }

    /// Polls until the process is terminated.
    pub async fn run_forever(&mut self) {
        let (_keep_alive, shutdown) = watch::channel(false);
        self.run(shutdown).await;
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::error::{OutputError, ReadingError};
    use crate::types::Temperature;

    #[derive(Clone, Default)]
    struct Collect(Arc<Mutex<Vec<CycleReport>>>);

    impl ReportSink for Collect {
        fn name(&self) -> &str {
            "collect"
        }

        fn report(&mut self, report: &CycleReport) -> Result<(), OutputError> {
            self.0.lock().unwrap().push(report.clone());
            Ok(())
        }
    }

    struct Failing;

    impl ReportSink for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn report(&mut self, _report: &CycleReport) -> Result<(), OutputError> {
            Err(OutputError::Write {
                target: "nowhere".to_string(),
                source: std::io::Error::other("disk full"),
            })
        }
    }

    fn add_sensor(base: &Path, name: &str, record: &str) {
        let dir = base.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("w1_slave"), record).unwrap();
    }

    fn ok_record(milli: i64) -> String {
        format!("72 01 ff ff f0 ff ff ff 64 : crc=64 YES\n72 01 ff ff f0 ff ff ff 64 t={milli}\n")
    }

    fn config(base: &Path, channels: u16) -> MonitorConfig {
        MonitorConfig::default()
            .with_base_dir(base)
            .with_max_channels(channels)
            .with_poll_interval(Duration::from_millis(100))
            .without_csv()
    }

    #[test]
    fn new_rejects_invalid_config() {
        assert!(Monitor::new(MonitorConfig::default().with_max_channels(0)).is_err());
    }

    #[tokio::test]
    async fn poll_reports_every_channel() {
        let dir = tempfile::tempdir().unwrap();
        add_sensor(dir.path(), "3b-000000000001", &ok_record(21500));
        add_sensor(dir.path(), "3b-000000000002", "crc=00 NO\nt=1\n");

        let mut monitor = Monitor::new(config(dir.path(), 4)).unwrap();
        let report = monitor.poll_once().await;

        assert_eq!(report.channels().len(), 4);
        let first = &report.channels()[0];
        assert_eq!(first.device(), Some(&DeviceId::new("3b-000000000001")));
        assert_eq!(first.temperature(), Some(Temperature::from_millidegrees(21500)));
        assert_eq!(report.channels()[1].error(), Some(&ReadingError::CrcInvalid));
        assert_eq!(report.channels()[2].status(), &ChannelStatus::NotConnected);
        assert_eq!(report.channels()[3].status(), &ChannelStatus::NotConnected);
    }

    #[tokio::test]
    async fn startup_banner_lists_found_and_missing_ports() {
        let dir = tempfile::tempdir().unwrap();
        add_sensor(dir.path(), "3b-000000000002", &ok_record(1000));
        add_sensor(dir.path(), "3b-000000000001", &ok_record(2000));

        let mut monitor = Monitor::new(config(dir.path(), 4)).unwrap();
        let banner = monitor.startup_banner().await;

        assert_eq!(
            banner,
            "Discovered 2 of 4 thermocouple port(s):\n  \
             Port 1: 3b-000000000001\n  \
             Port 2: 3b-000000000002\n  \
             Ports 3-4: not found\n"
        );
        assert_eq!(monitor.assignment().len(), 2);

        let report = monitor.poll_once().await;
        assert_eq!(
            report.channels()[0].device(),
            Some(&DeviceId::new("3b-000000000001"))
        );
    }

    #[tokio::test]
    async fn missing_record_is_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("3b-000000000001")).unwrap();

        let mut monitor = Monitor::new(config(dir.path(), 2)).unwrap();
        let report = monitor.poll_once().await;

        assert!(matches!(
            report.channels()[0].error(),
            Some(ReadingError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn vanished_device_keeps_its_channel() {
        let dir = tempfile::tempdir().unwrap();
        add_sensor(dir.path(), "3b-a", &ok_record(1000));
        add_sensor(dir.path(), "3b-b", &ok_record(2000));

        let mut monitor = Monitor::new(config(dir.path(), 3)).unwrap();
        monitor.poll_once().await;

        std::fs::remove_dir_all(dir.path().join("3b-a")).unwrap();
        add_sensor(dir.path(), "3b-0", &ok_record(3000));

        let report = monitor.poll_once().await;
        assert_eq!(report.channels()[0].status(), &ChannelStatus::NotConnected);
        assert_eq!(report.channels()[1].device(), Some(&DeviceId::new("3b-b")));
        assert_eq!(report.channels()[2].device(), Some(&DeviceId::new("3b-0")));

        add_sensor(dir.path(), "3b-a", &ok_record(1500));
        let report = monitor.poll_once().await;
        assert_eq!(report.channels()[0].device(), Some(&DeviceId::new("3b-a")));
        assert_eq!(
            report.channels()[0].temperature(),
            Some(Temperature::from_millidegrees(1500))
        );
    }

    #[tokio::test]
    async fn run_cycle_survives_failing_sink() {
        let dir = tempfile::tempdir().unwrap();
        add_sensor(dir.path(), "3b-a", &ok_record(1000));

        let collect = Collect::default();
        let mut monitor = Monitor::new(config(dir.path(), 1))
            .unwrap()
            .with_sink(Failing)
            .with_sink(collect.clone());

        monitor.run_cycle().await;
        assert_eq!(collect.0.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        add_sensor(dir.path(), "3b-a", &ok_record(1000));

        let collect = Collect::default();
        let mut monitor = Monitor::new(config(dir.path(), 1))
            .unwrap()
            .with_sink(collect.clone());

        let (stop, shutdown) = watch::channel(false);
        let task = tokio::spawn(async move {
            monitor.run(shutdown).await;
        });

        while collect.0.lock().unwrap().len() < 3 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        stop.send(true).unwrap();
        task.await.unwrap();

        let cycles = collect.0.lock().unwrap().len();
        assert!(cycles >= 3);
    }

    #[tokio::test]
    async fn run_exits_immediately_when_already_stopped() {
        let dir = tempfile::tempdir().unwrap();
        let collect = Collect::default();
        let mut monitor = Monitor::new(config(dir.path(), 1))
            .unwrap()
            .with_sink(collect.clone());

        let (_stop, shutdown) = watch::channel(true);
        monitor.run(shutdown).await;

        assert!(collect.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn run_stops_when_sender_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let collect = Collect::default();
        let mut monitor = Monitor::new(config(dir.path(), 1))
            .unwrap()
            .with_sink(collect.clone());

        let (stop, shutdown) = watch::channel(false);
        drop(stop);
        monitor.run(shutdown).await;

        assert_eq!(collect.0.lock().unwrap().len(), 1);
    }
}
