// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Results of one poll cycle.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::ReadingError;
use crate::reading::Reading;
use crate::types::{Channel, DeviceId, Temperature};

/// What a channel produced during a cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelStatus {
    /// A device on this channel was present and has been read.
    Reading {
        /// The device assigned to the channel.
        device: DeviceId,
        /// The temperature or the reason there is none.
        reading: Reading,
    },
    /// No device with this channel was present.
    NotConnected,
}

/// Outcome of one channel in a cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelReport {
    channel: Channel,
    status: ChannelStatus,
}

impl ChannelReport {
    /// Creates a report for a channel.
    #[must_use]
    pub fn new(channel: Channel, status: ChannelStatus) -> Self {
        Self { channel, status }
    }

    /// Returns the channel.
    #[must_use]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Returns the channel status.
    #[must_use]
    pub fn status(&self) -> &ChannelStatus {
        &self.status
    }

    /// Returns the device read on this channel, if one was present.
    #[must_use]
    pub fn device(&self) -> Option<&DeviceId> {
        match &self.status {
            ChannelStatus::Reading { device, .. } => Some(device),
            ChannelStatus::NotConnected => None,
        }
    }

    /// Returns the temperature, if the channel was read successfully.
    #[must_use]
    pub fn temperature(&self) -> Option<Temperature> {
        match &self.status {
            ChannelStatus::Reading {
                reading: Ok(temperature),
                ..
            } => Some(*temperature),
            _ => None,
        }
    }

    /// Returns the read failure, if the channel had a device that failed.
    #[must_use]
    pub fn error(&self) -> Option<&ReadingError> {
        match &self.status {
            ChannelStatus::Reading {
                reading: Err(err), ..
            } => Some(err),
            _ => None,
        }
    }
}

/// Everything collected during one poll cycle.
///
/// Holds one [`ChannelReport`] per configured channel, in channel order.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    timestamp: DateTime<Utc>,
    channels: Vec<ChannelReport>,
}

impl CycleReport {
    /// Creates a report from the per-channel results.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, channels: Vec<ChannelReport>) -> Self {
        Self {
            timestamp,
            channels,
        }
    }

    /// Returns when the cycle started.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the timestamp as ISO-8601 UTC with milliseconds,
    /// e.g. `2024-05-01T12:00:00.123Z`.
    #[must_use]
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Returns the per-channel results, in channel order.
    #[must_use]
    pub fn channels(&self) -> &[ChannelReport] {
        &self.channels
    }

    /// Returns the result for `channel`, if it is configured.
    #[must_use]
    pub fn channel(&self, channel: Channel) -> Option<&ChannelReport> {
        self.channels.iter().find(|report| report.channel == channel)
    }

    /// Returns the number of channels with a temperature.
    #[must_use]
    pub fn ok_count(&self) -> usize {
        self.channels
            .iter()
            .filter(|report| report.temperature().is_some())
            .count()
    }

    /// Returns the number of channels whose device failed to read.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.channels
            .iter()
            .filter(|report| report.error().is_some())
            .count()
    }
}
