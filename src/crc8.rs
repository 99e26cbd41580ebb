// Copyright (c) 2022 Lucian Carata <luc@rez.how>
//
// This file is part of the sensor-temp-humidity-sht21 crate, and is dually
// licensed under Apache License Version 2.0 or the BSD 3-clause License.
//
// For full licensing details, consult the LICENSE file in the root directory
// of the crate.
//

//! CRC-8 as used by the SHT2x family: polynomial x^8 + x^5 + x^4 + 1
//! (0x131), MSB first, initial value 0x00, no final XOR.
//!
//! Note that this differs from the SHT3x/SHT4x parts, which start the
//! register at 0xFF.

use crc_any::CRCu8;

/// Compute the checksum of `data`, any length.
pub fn calculate(data: &[u8]) -> u8 {
    // Poly (0x31), bits (8), initial (0x00), final_xor (0x00), reflect (false).
    let mut crc = CRCu8::create_crc(0x31, 8, 0x00, 0x00, false);
    crc.digest(data);
    crc.get_crc()
}

/// Returns true when `checksum` matches the CRC of `data`.
pub fn validate(data: &[u8], checksum: u8) -> bool {
    calculate(data) == checksum
}

#[cfg(test)]
mod tests {
    use super::*;

    // pairs taken from the SHT2x/HTU21D datasheet examples
    const KNOWN_GOOD: [([u8; 2], u8); 3] = [
        ([0x00, 0xDC], 0x79),
        ([0x68, 0x3A], 0x7C),
        ([0x4E, 0x85], 0x6B),
    ];

    #[test]
    fn test_crc8_known_values() {
        for (data, checksum) in KNOWN_GOOD {
            assert_eq!(calculate(&data), checksum);
            assert!(validate(&data, checksum));
        }
    }

    #[test]
    fn test_crc8_empty_and_single_byte() {
        assert_eq!(calculate(&[]), 0x00);
        assert_eq!(calculate(&[0x12]), 0x21);
        assert_eq!(calculate(&[0x56]), 0xD8);
    }

    #[test]
    fn test_crc8_detects_single_bit_errors() {
        for (data, checksum) in KNOWN_GOOD {
            for bit in 0..16 {
                let mut corrupted = data;
                corrupted[bit / 8] ^= 1 << (bit % 8);
                assert!(!validate(&corrupted, checksum));
            }
            for bit in 0..8 {
                assert!(!validate(&data, checksum ^ (1 << bit)));
            }
        }
    }
}
