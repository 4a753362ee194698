// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stable mapping from sensors to logical channels.
//!
//! Sensors are named by serial number, and the order in which the kernel
//! lists them says nothing about which physical port they are wired to. To
//! keep each CSV column tied to one sensor, the first time a sensor is seen
//! it receives the next free channel and keeps it for the lifetime of the
//! [`ChannelAssignment`], even while it is unplugged.
//!
//! The number of channels handed out is capped. The cap counts every
//! assignment ever made, so a sensor that vanishes does not free its channel
//! for a newcomer.
//!
//! # Examples
//!
//! ```
//! use max31850_monitor::assignment::ChannelAssignment;
//! use max31850_monitor::types::DeviceId;
//!
//! let mut channels = ChannelAssignment::new(2);
//! let d1 = DeviceId::new("3b-01");
//! let d2 = DeviceId::new("3b-02");
//! let d3 = DeviceId::new("3b-03");
//!
//! channels.assign(&[d1.clone(), d2.clone()]);
//! let present = channels.assign(&[d2.clone(), d3.clone()]);
//!
//! // d2 kept channel 2, d3 got nothing because two channels were already used.
//! assert_eq!(present.len(), 1);
//! assert_eq!(present[0].0.value(), 2);
//! assert_eq!(present[0].1, d2);
//! assert!(channels.channel_of(&d3).is_none());
//! ```

use std::collections::HashMap;

use crate::types::{Channel, DeviceId};

/// Owned sensor-to-channel mapping, kept for the lifetime of a monitor.
#[derive(Debug, Clone)]
pub struct ChannelAssignment {
    /// Assigned channels, keyed by device.
    channels: HashMap<DeviceId, Channel>,
    /// Devices in assignment order; index `i` holds channel `i + 1`.
    order: Vec<DeviceId>,
    /// Cap on the cumulative number of assignments.
    max_channels: u16,
}

impl ChannelAssignment {
    /// Creates an empty assignment that hands out at most `max_channels`
    /// channels.
    #[must_use]
    pub fn new(max_channels: u16) -> Self {
        Self {
            channels: HashMap::with_capacity(usize::from(max_channels)),
            order: Vec::with_capacity(usize::from(max_channels)),
            max_channels,
        }
    }

    /// Records the devices present in this discovery pass and returns the
    /// channel of each present device that has one, sorted by channel.
    ///
    /// `discovered` is expected in discovery order (sorted by identifier).
    /// New devices get the next channel while the cap allows it; known
    /// devices keep theirs. Known devices missing from `discovered` are left
    /// out of the result but stay assigned.
    pub fn assign(&mut self, discovered: &[DeviceId]) -> Vec<(Channel, DeviceId)> {
        for id in discovered {
            if self.channels.contains_key(id) {
                continue;
            }

            let Some(channel) = self.next_channel() else {
                tracing::debug!(device = %id, "No channel left for device, ignoring");
                continue;
            };

            tracing::info!(device = %id, channel = channel.value(), "Assigned channel");
            self.channels.insert(id.clone(), channel);
            self.order.push(id.clone());
        }

        let mut present: Vec<(Channel, DeviceId)> = discovered
            .iter()
            .filter_map(|id| self.channels.get(id).map(|channel| (*channel, id.clone())))
            .collect();
        present.sort_by_key(|(channel, _)| *channel);
        present.dedup_by_key(|(channel, _)| *channel);
        present
    }

    /// Returns the channel assigned to `id`, if any.
    #[must_use]
    pub fn channel_of(&self, id: &DeviceId) -> Option<Channel> {
        self.channels.get(id).copied()
    }

    /// Returns the number of devices that have a channel.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no device has been assigned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns `true` once the cap has been reached. No further device will
    /// ever be assigned.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.order.len() >= usize::from(self.max_channels)
    }

    /// Returns the cap on assignments.
    #[must_use]
    pub fn max_channels(&self) -> u16 {
        self.max_channels
    }

    fn next_channel(&self) -> Option<Channel> {
        if self.is_full() {
            return None;
        }
        u16::try_from(self.order.len() + 1).ok().and_then(Channel::new)
    }
}
