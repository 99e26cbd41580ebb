// Copyright (c) 2022 Lucian Carata <luc@rez.how>
//
// This file is part of the sensor-temp-humidity-sht21 crate, and is dually
// licensed under Apache License Version 2.0 or the BSD 3-clause License.
//
// For full licensing details, consult the LICENSE file in the root directory
// of the crate.
//

/// The I2C bus used by the driver, either handed over to it or lent for the
/// driver's lifetime. Only an owned bus is given back by
/// [`release`](Bus::release).
#[derive(Debug)]
pub(crate) enum Bus<'a, I2C> {
    Owned(I2C),
    Borrowed(&'a mut I2C),
}

impl<'a, I2C> Bus<'a, I2C> {
    pub(crate) fn get(&mut self) -> &mut I2C {
        match self {
            Bus::Owned(i2c) => i2c,
            Bus::Borrowed(i2c) => &mut **i2c,
        }
    }

    /// Give back an owned bus; a borrowed one simply ends its borrow.
    pub(crate) fn release(self) -> Option<I2C> {
        match self {
            Bus::Owned(i2c) => Some(i2c),
            Bus::Borrowed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_bus_is_released() {
        let mut bus: Bus<'_, u8> = Bus::Owned(7);
        *bus.get() += 1;
        assert_eq!(bus.release(), Some(8));
    }

    #[test]
    fn test_borrowed_bus_writes_through() {
        let mut value = 7u8;
        {
            let mut bus = Bus::Borrowed(&mut value);
            *bus.get() += 1;
            assert_eq!(bus.release(), None);
        }
        assert_eq!(value, 8);
    }
}
