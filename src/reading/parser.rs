// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for `w1_slave` sensor records.

use crate::error::ReadingError;
use crate::types::Temperature;

/// Marker the driver appends to the first line when the CRC matched.
const CRC_OK_MARKER: &str = "YES";

/// Prefix of the temperature field on the second line.
const TEMPERATURE_FIELD: &str = "t=";

/// Parses the raw content of a `w1_slave` record into a temperature.
///
/// The first line, trimmed, must end with `YES`. The second line must contain
/// `t=` followed by a base-10 integer of milli-degrees Celsius. The returned
/// value keeps full precision (`t=24125` gives 24.125 °C).
///
/// # Errors
///
/// - [`ReadingError::CrcInvalid`] if the first line is missing or does not
///   end with `YES`, whatever the second line holds.
/// - [`ReadingError::TemperatureFieldMissing`] if the second line is missing
///   or has no `t=`.
/// - [`ReadingError::MalformedNumber`] if the text after `t=` is not an
///   integer.
pub fn parse_w1_slave(raw: &str) -> Result<Temperature, ReadingError> {
    let mut lines = raw.lines();

    let crc_line = lines.next().ok_or(ReadingError::CrcInvalid)?;
    if !crc_line.trim().ends_with(CRC_OK_MARKER) {
        return Err(ReadingError::CrcInvalid);
    }

    let data_line = lines.next().ok_or(ReadingError::TemperatureFieldMissing)?;
    let (_, value) = data_line
        .split_once(TEMPERATURE_FIELD)
        .ok_or(ReadingError::TemperatureFieldMissing)?;

    let value = value.trim();
    let milli: i64 = value
        .parse()
        .map_err(|_| ReadingError::MalformedNumber(value.to_string()))?;

    Ok(Temperature::from_millidegrees(milli))
}
