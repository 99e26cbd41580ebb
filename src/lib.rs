// Copyright (c) 2022 Lucian Carata <luc@rez.how>
//
// This file is part of the sensor-temp-humidity-sht21 crate, and is dually
// licensed under Apache License Version 2.0 or the BSD 3-clause License.
//
// For full licensing details, consult the LICENSE file in the root directory
// of the crate.
//
#![cfg_attr(not(test), no_std)]

//! This is a rust [`embedded-hal`](https://github.com/rust-embedded/embedded-hal)
//! driver for the Sensirion SHT21 temperature and relative-humidity sensor.
//!
//! By depending on embedded-hal, this driver is platform-agnostic and can be
//! used with any physical device implementing the embedded-hal 1.0 `I2c` and
//! `DelayNs` traits.
//!
//! The full details about the SHT21 sensor can be read in its datasheet:
//! https://sensirion.com/media/documents/120BBE4C/63500094/Sensirion_Datasheet_Humidity_Sensor_SHT21.pdf
//!
//! ## Usage:
//!
//! The driver can either take ownership of the bus, or borrow one that is
//! shared with other code:
//!
//! ```ignore
//! use linux_embedded_hal as hal;
//!
//! use hal::{I2cdev, Delay};
//! use sensor_temp_humidity_sht21::SHT21Driver;
//!
//! fn main() {
//!     let mut i2c_dev = I2cdev::new("/dev/i2c-1").unwrap();
//!     let mut sht21 = SHT21Driver::new_borrowed(&mut i2c_dev, Delay);
//!
//!     if let Ok(m) = sht21.measure() {
//!       println!("Temp: {temp} C, Relative Humidity: {rh} %",
//!                temp = m.temperature,
//!                rh = m.humidity);
//!     }
//! }
//! ```
//!
//! ## Features
//!
//! - `log`: driver diagnostics through the `log` facade
//! - `defmt`: driver diagnostics through `defmt`, plus `defmt::Format` on
//!   the public types

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

#[macro_use]
mod fmt;

mod bus;
pub mod conversion;
pub mod crc8;
mod error;
mod types;

use embedded_hal as hal;

use hal::delay::DelayNs;
use hal::i2c::{Error as _, ErrorKind, I2c};

use bus::Bus;
pub use conversion::{humidity_from_raw, temperature_from_raw};
pub use error::{Error, Result};
pub use types::*;

/// Settle time after a soft reset (datasheet: "less than 15 ms")
const RESET_DURATION_MS: u32 = 15;

/// Pause between two no-hold-master read attempts
const POLL_INTERVAL_MS: u32 = 1;

#[derive(Clone, Copy)]
enum Command {
    SoftReset,
    MeasureTemperature(MeasurementMode),
    MeasureHumidity(MeasurementMode),
    ReadUserRegister,
    WriteUserRegister,
    ReadSerialFirstPart,
    ReadSerialSecondPart,
}

impl Command {
    fn as_bytes(self) -> &'static [u8] {
        match self {
            Command::SoftReset => &[0xFE],
            Command::MeasureTemperature(mode) => match mode {
                MeasurementMode::HoldMaster => &[0xE3],
                MeasurementMode::NoHoldMaster => &[0xF3],
            },
            Command::MeasureHumidity(mode) => match mode {
                MeasurementMode::HoldMaster => &[0xE5],
                MeasurementMode::NoHoldMaster => &[0xF5],
            },
            Command::ReadUserRegister => &[0xE7],
            Command::WriteUserRegister => &[0xE6],
            Command::ReadSerialFirstPart => &[0xFA, 0x0F],
            Command::ReadSerialSecondPart => &[0xFC, 0xC9],
        }
    }
}

#[derive(Debug)]
pub struct SHT21Driver<'a, I2C, D> {
    bus: Bus<'a, I2C>,
    delay: D,
    config: Config,
}

impl<I2C, D> SHT21Driver<'static, I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a driver that owns the bus, with the default configuration
    /// (address 0x40, hold-master measurements).
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_config(i2c, delay, Config::default())
    }

    pub fn with_config(i2c: I2C, delay: D, config: Config) -> Self {
        SHT21Driver { bus: Bus::Owned(i2c), delay, config }
    }
}

impl<'a, I2C, D> SHT21Driver<'a, I2C, D> {
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Tear the driver down. The bus is only handed back if the driver owned
    /// it.
    pub fn destroy(self) -> (Option<I2C>, D) {
        (self.bus.release(), self.delay)
    }
}

impl<'a, I2C, D> SHT21Driver<'a, I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a driver on a bus that stays owned by the caller.
    pub fn new_borrowed(i2c: &'a mut I2C, delay: D) -> Self {
        Self::with_config_borrowed(i2c, delay, Config::default())
    }

    pub fn with_config_borrowed(i2c: &'a mut I2C, delay: D, config: Config) -> Self {
        SHT21Driver { bus: Bus::Borrowed(i2c), delay, config }
    }

    /// Temperature in degrees Celsius.
    pub fn temperature(&mut self) -> Result<f32, I2C::Error> {
        let raw = self.read_raw(Command::MeasureTemperature(self.config.mode))?;
        Ok(temperature_from_raw(raw))
    }

    /// Relative humidity in percent, without temperature compensation.
    pub fn humidity(&mut self) -> Result<f32, I2C::Error> {
        let raw = self.read_raw(Command::MeasureHumidity(self.config.mode))?;
        Ok(humidity_from_raw(raw))
    }

    /// Temperature followed by humidity, as two separate measurements.
    pub fn measure(&mut self) -> Result<Measurement, I2C::Error> {
        let temperature = self.temperature()?;
        let humidity = self.humidity()?;
        Ok(Measurement { temperature, humidity })
    }

    /// Soft reset: the sensor reboots and reloads its calibration, and the
    /// user register goes back to its defaults (except the heater bit).
    /// Blocks for the 15 ms the reset takes.
    pub fn reset(&mut self) -> Result<(), I2C::Error> {
        debug!("sht21: soft reset");
        self.write_command(Command::SoftReset)?;
        self.delay.delay_ms(RESET_DURATION_MS);
        Ok(())
    }

    pub fn serial_number(&mut self) -> Result<SerialNumber, I2C::Error> {
        let mut first = [0u8; 8];
        let mut second = [0u8; 6];
        self.command_and_response(Command::ReadSerialFirstPart, &mut first)?;
        self.command_and_response(Command::ReadSerialSecondPart, &mut second)?;
        SerialNumber::from_read_bytes(&first, &second).ok_or_else(|| {
            warn!("sht21: serial number failed checksum validation");
            Error::Crc
        })
    }

    pub fn user_register(&mut self) -> Result<UserRegister, I2C::Error> {
        let mut reg = [0u8; 1];
        self.command_and_response(Command::ReadUserRegister, &mut reg)?;
        Ok(UserRegister(reg[0]))
    }

    /// Write the user register as given. Prefer [`set_resolution`] and
    /// [`set_heater`], which keep the reserved bits as the sensor reports
    /// them.
    ///
    /// [`set_resolution`]: SHT21Driver::set_resolution
    /// [`set_heater`]: SHT21Driver::set_heater
    pub fn set_user_register(&mut self, reg: UserRegister) -> Result<(), I2C::Error> {
        let cmd = Command::WriteUserRegister.as_bytes()[0];
        trace!("sht21: write user register {:#x}", reg.0);
        self.bus
            .get()
            .write(self.config.address, &[cmd, reg.0])
            .map_err(Error::I2c)
    }

    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<(), I2C::Error> {
        let reg = self.user_register()?;
        self.set_user_register(reg.with_resolution(resolution))
    }

    pub fn set_heater(&mut self, enabled: bool) -> Result<(), I2C::Error> {
        let reg = self.user_register()?;
        self.set_user_register(reg.with_heater(enabled))
    }

    fn write_command(&mut self, cmd: Command) -> Result<(), I2C::Error> {
        let bytes = cmd.as_bytes();
        trace!("sht21: command {:#x}", bytes[0]);
        self.bus
            .get()
            .write(self.config.address, bytes)
            .map_err(Error::I2c)
    }

    fn command_and_response(&mut self, cmd: Command, rx_bytes: &mut [u8]) -> Result<(), I2C::Error> {
        self.write_command(cmd)?;
        self.bus
            .get()
            .read(self.config.address, rx_bytes)
            .map_err(Error::I2c)
    }

    /// Trigger a measurement and return the 16-bit reading, status bits
    /// included. The transaction is always: command write, 2-byte data read,
    /// 1-byte checksum read. A checksum mismatch resets the sensor before
    /// the error is returned.
    fn read_raw(&mut self, cmd: Command) -> Result<u16, I2C::Error> {
        let mut data = [0u8; 2];
        let mut checksum = [0u8; 1];

        self.write_command(cmd)?;
        self.read_measurement_data(&mut data)?;
        self.bus
            .get()
            .read(self.config.address, &mut checksum)
            .map_err(Error::I2c)?;

        if !crc8::validate(&data, checksum[0]) {
            warn!(
                "sht21: checksum mismatch on {:#x} {:#x} (got {:#x}), resetting",
                data[0],
                data[1],
                checksum[0]
            );
            self.reset()?;
            return Err(Error::Crc);
        }
        Ok(u16::from_be_bytes(data))
    }

    fn read_measurement_data(&mut self, data: &mut [u8]) -> Result<(), I2C::Error> {
        let address = self.config.address;
        if self.config.mode == MeasurementMode::HoldMaster {
            return self.bus.get().read(address, data).map_err(Error::I2c);
        }

        // no-hold-master: the sensor NACKs its address until the conversion
        // is done
        let mut waited_ms = 0;
        loop {
            match self.bus.get().read(address, data) {
                Ok(()) => return Ok(()),
                Err(err) if matches!(err.kind(), ErrorKind::NoAcknowledge(_)) => {
                    if waited_ms >= self.config.poll_timeout_ms {
                        warn!("sht21: no measurement after {} ms", waited_ms);
                        return Err(Error::Timeout);
                    }
                    debug!("sht21: measurement not ready, retrying");
                    self.delay.delay_ms(POLL_INTERVAL_MS);
                    waited_ms += POLL_INTERVAL_MS;
                }
                Err(err) => return Err(Error::I2c(err)),
            }
        }
    }
}
