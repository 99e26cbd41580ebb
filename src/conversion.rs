// Copyright (c) 2022 Lucian Carata <luc@rez.how>
//
// This file is part of the sensor-temp-humidity-sht21 crate, and is dually
// licensed under Apache License Version 2.0 or the BSD 3-clause License.
//
// For full licensing details, consult the LICENSE file in the root directory
// of the crate.
//

//! Linear transfer functions from the SHT21 datasheet (section 6). No
//! temperature compensation is applied to the humidity value.

/// The two least significant bits of a raw reading carry status
/// information (bit 1 is set for humidity, clear for temperature).
const STATUS_BITS: u16 = 0x0003;

#[inline]
fn mask_status(raw: u16) -> f32 {
    (raw & !STATUS_BITS) as f32
}

/// T = -46.85 + 175.72 * S_T / 2^16, in degrees Celsius.
pub fn temperature_from_raw(raw: u16) -> f32 {
    -46.85 + 175.72 * mask_status(raw) / 65536.0
}

/// RH = -6 + 125 * S_RH / 2^16, in percent. Values slightly outside
/// [0, 100] are possible and are returned as-is.
pub fn humidity_from_raw(raw: u16) -> f32 {
    -6.0 + 125.0 * mask_status(raw) / 65536.0
}
