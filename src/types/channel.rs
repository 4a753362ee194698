// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Logical channel number type.

use std::fmt;

/// Logical port number assigned to a sensor (1-based).
///
/// Channels are handed out by [`ChannelAssignment`](crate::assignment::ChannelAssignment)
/// in sequence and map one-to-one to the `tempN` columns of the CSV log.
///
/// # Examples
///
/// ```
/// use max31850_monitor::types::Channel;
///
/// let first = Channel::FIRST;
/// assert_eq!(first.value(), 1);
/// assert!(Channel::new(0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Channel(u16);

impl Channel {
    /// The first channel.
    pub const FIRST: Self = Self(1);

    /// Creates a channel from its number.
    ///
    /// Returns `None` for zero.
    #[must_use]
    pub const fn new(value: u16) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    /// Returns the channel number.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// Iterates over channels `1..=count`.
    pub fn range(count: u16) -> impl Iterator<Item = Self> {
        (1..=count).map(Self)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Channel> for u16 {
    fn from(channel: Channel) -> Self {
        channel.0
    }
}
