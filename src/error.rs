// Copyright (c) 2022 Lucian Carata <luc@rez.how>
//
// This file is part of the sensor-temp-humidity-sht21 crate, and is dually
// licensed under Apache License Version 2.0 or the BSD 3-clause License.
//
// For full licensing details, consult the LICENSE file in the root directory
// of the crate.
//

#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Error on the I2C bus
    #[error("i2c bus error: {0:?}")]
    I2c(E),

    /// Failed checksum validation
    #[error("checksum mismatch")]
    Crc,

    /// The sensor kept NACKing a no-hold-master read past the configured
    /// poll timeout
    #[error("timed out waiting for measurement")]
    Timeout,
}

pub type Result<T, E> = core::result::Result<T, Error<E>>;
