// Copyright (c) 2022 Lucian Carata <luc@rez.how>
//
// This file is part of the sensor-temp-humidity-sht21 crate, and is dually
// licensed under Apache License Version 2.0 or the BSD 3-clause License.
//
// For full licensing details, consult the LICENSE file in the root directory
// of the crate.
//

use crate::crc8;

/// SHT21 has a single, fixed 7-bit I2C address.
pub const DEFAULT_ADDRESS: u8 = 0x40;

/// How the driver waits for a triggered measurement to complete.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasurementMode {
    /// The sensor holds SCL low until the conversion is done, so the data
    /// read simply blocks (commands 0xE3 / 0xE5).
    HoldMaster,

    /// The sensor NACKs reads until the conversion is done; the driver
    /// polls every millisecond (commands 0xF3 / 0xF5).
    NoHoldMaster,
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub address: u8,
    pub mode: MeasurementMode,
    /// Upper bound on no-hold-master polling. Ignored in hold-master mode.
    pub poll_timeout_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            address: DEFAULT_ADDRESS,
            mode: MeasurementMode::HoldMaster,
            poll_timeout_ms: Resolution::Rh12T14.max_temp_duration_ms(),
        }
    }
}

/// Measurement resolution, stored in bits 7 and 0 of the user register.
///
/// Conversion times are the datasheet maxima; a lower resolution trades
/// precision for a faster conversion and lower energy per measurement.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// RH 12 bit (29 ms), T 14 bit (85 ms). Power-on default.
    Rh12T14,
    /// RH 8 bit (4 ms), T 12 bit (22 ms)
    Rh8T12,
    /// RH 10 bit (9 ms), T 13 bit (43 ms)
    Rh10T13,
    /// RH 11 bit (15 ms), T 11 bit (11 ms)
    Rh11T11,
}

impl Resolution {
    const MASK: u8 = 0b1000_0001;

    fn bits(self) -> u8 {
        match self {
            Resolution::Rh12T14 => 0b0000_0000,
            Resolution::Rh8T12 => 0b0000_0001,
            Resolution::Rh10T13 => 0b1000_0000,
            Resolution::Rh11T11 => 0b1000_0001,
        }
    }

    fn from_bits(reg: u8) -> Self {
        match reg & Resolution::MASK {
            0b0000_0000 => Resolution::Rh12T14,
            0b0000_0001 => Resolution::Rh8T12,
            0b1000_0000 => Resolution::Rh10T13,
            _ => Resolution::Rh11T11,
        }
    }

    pub fn max_temp_duration_ms(self) -> u32 {
        match self {
            Resolution::Rh12T14 => 85,
            Resolution::Rh8T12 => 22,
            Resolution::Rh10T13 => 43,
            Resolution::Rh11T11 => 11,
        }
    }

    pub fn max_humidity_duration_ms(self) -> u32 {
        match self {
            Resolution::Rh12T14 => 29,
            Resolution::Rh8T12 => 4,
            Resolution::Rh10T13 => 9,
            Resolution::Rh11T11 => 15,
        }
    }
}

/// Contents of the sensor's user register.
///
/// | bit  | meaning                                   |
/// |------|-------------------------------------------|
/// | 7, 0 | measurement resolution                    |
/// | 6    | end of battery, VDD < 2.25 V (read-only)  |
/// | 5..3 | reserved, must be written back unchanged  |
/// | 2    | on-chip heater enabled                    |
/// | 1    | OTP reload disabled                       |
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UserRegister(pub u8);

impl UserRegister {
    const END_OF_BATTERY: u8 = 1 << 6;
    const HEATER: u8 = 1 << 2;
    const DISABLE_OTP_RELOAD: u8 = 1 << 1;

    pub fn resolution(self) -> Resolution {
        Resolution::from_bits(self.0)
    }

    pub fn end_of_battery(self) -> bool {
        self.0 & Self::END_OF_BATTERY != 0
    }

    pub fn heater_enabled(self) -> bool {
        self.0 & Self::HEATER != 0
    }

    pub fn otp_reload_disabled(self) -> bool {
        self.0 & Self::DISABLE_OTP_RELOAD != 0
    }

    pub fn with_resolution(self, resolution: Resolution) -> Self {
        UserRegister((self.0 & !Resolution::MASK) | resolution.bits())
    }

    pub fn with_heater(self, enabled: bool) -> Self {
        if enabled {
            UserRegister(self.0 | Self::HEATER)
        } else {
            UserRegister(self.0 & !Self::HEATER)
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// degrees Celsius
    pub temperature: f32,
    /// percent relative humidity
    pub humidity: f32,
}

/// The factory-programmed 64-bit electronic identification code.
///
/// Bytes are stored least significant first: `[SNC_0, SNC_1, SNB_0,
/// SNB_1, SNB_2, SNB_3, SNA_0, SNA_1]` in the naming of Sensirion's
/// "Electronic Identification Code" application note.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialNumber(pub [u8; 8]);

impl SerialNumber {
    /// Reassemble the identifier from the responses to the two memory
    /// reads (0xFA 0x0F, then 0xFC 0xC9), checking every embedded CRC.
    ///
    /// `first` is `SNB_3 crc SNB_2 crc SNB_1 crc SNB_0 crc`, every data byte
    /// followed by its own checksum. `second` is `SNC_1 SNC_0 crc SNA_1
    /// SNA_0 crc`, one checksum per pair.
    pub(crate) fn from_read_bytes(first: &[u8; 8], second: &[u8; 6]) -> Option<Self> {
        let first_ok = first
            .chunks_exact(2)
            .all(|pair| crc8::validate(&pair[..1], pair[1]));
        let second_ok = second
            .chunks_exact(3)
            .all(|word| crc8::validate(&word[..2], word[2]));
        if !(first_ok && second_ok) {
            return None;
        }

        let mut sn = [0u8; 8];
        sn[5] = first[0];
        sn[4] = first[2];
        sn[3] = first[4];
        sn[2] = first[6];
        sn[1] = second[0];
        sn[0] = second[1];
        sn[7] = second[3];
        sn[6] = second[4];
        Some(SerialNumber(sn))
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    pub fn as_u64(&self) -> u64 {
        u64::from_le_bytes(self.0)
    }
}
