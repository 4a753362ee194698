// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MAX31850K monitor - print and log thermocouple readings every few seconds.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use max31850_monitor::output::{ConsoleReporter, CsvRecorder};
use max31850_monitor::{Monitor, MonitorConfig};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// Poll MAX31850K thermocouple sensors on the 1-Wire bus.
#[derive(Parser, Debug)]
#[command(name = "max31850-monitor")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file; command-line options override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the 1-Wire device entries.
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Device directory name prefix.
    #[arg(long)]
    prefix: Option<String>,

    /// Number of thermocouple channels.
    #[arg(short = 'n', long)]
    channels: Option<u16>,

    /// Delay between poll cycles, in milliseconds.
    #[arg(short, long)]
    interval_ms: Option<u64>,

    /// CSV log file.
    #[arg(long, conflicts_with = "no_csv")]
    csv: Option<PathBuf>,

    /// Do not write a CSV log.
    #[arg(long)]
    no_csv: bool,

    /// Run a single cycle and exit.
    #[arg(long)]
    once: bool,

    /// Verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<MonitorConfig, max31850_monitor::ConfigError> {
        let mut config = match &self.config {
            Some(path) => MonitorConfig::from_json_file(path)?,
            None => MonitorConfig::default(),
        };

        if let Some(base_dir) = self.base_dir {
            config = config.with_base_dir(base_dir);
        }
        if let Some(prefix) = self.prefix {
            config = config.with_family_prefix(prefix);
        }
        if let Some(channels) = self.channels {
            config = config.with_max_channels(channels);
        }
        if let Some(interval_ms) = self.interval_ms {
            config = config.with_poll_interval(Duration::from_millis(interval_ms));
        }
        if let Some(csv) = self.csv {
            config = config.with_csv_path(csv);
        }
        if self.no_csv {
            config = config.without_csv();
        }

        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("max31850_monitor={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let once = args.once;
    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let csv = config
        .csv_path
        .clone()
        .map(|path| CsvRecorder::new(path, config.max_channels));

    let mut monitor = match Monitor::new(config) {
        Ok(monitor) => monitor.with_sink(ConsoleReporter::stdout()),
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    if let Some(csv) = csv {
        tracing::info!(path = %csv.path().display(), "Logging readings to CSV");
        monitor = monitor.with_sink(csv);
    }

    print!("{}", monitor.startup_banner().await);
    println!("\nReading temperatures...\n");

    if once {
        monitor.run_cycle().await;
        return ExitCode::SUCCESS;
    }

    let (stop, shutdown) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Interrupt received, stopping after current cycle");
                let _ = stop.send(true);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cannot listen for interrupts");
                // Keep the sender alive so the loop runs until killed.
                std::future::pending::<()>().await;
            }
        }
    });

    monitor.run(shutdown).await;
    ExitCode::SUCCESS
}
