// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by discovery, assignment and reporting.
//!
//! # Types
//!
//! - [`DeviceId`] - 1-Wire device name such as `3b-0000001a2b3c`
//! - [`Channel`] - Logical port number, starting at 1
//! - [`Temperature`] - Celsius value decoded from a milli-degree field

mod channel;
mod device_id;
mod temperature;

pub use channel::Channel;
pub use device_id::DeviceId;
pub use temperature::Temperature;
