// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Cartridge header checksum.

/// First byte of the checksummed header region (title onward).
pub const HEADER_START: usize = 0x134;
/// One past the last checksummed byte.
pub const HEADER_END: usize = 0x14d;

/// Compute the header checksum the boot ROM validates: over
/// `[0x134, 0x14D)`, `checksum = checksum - byte - 1` accumulated mod 256.
/// Offsets past the end of a short image contribute nothing.
pub fn header_checksum(image: &[u8]) -> u8 {
    let mut checksum: u8 = 0;
    for offset in HEADER_START..HEADER_END {
        if let Some(val) = image.get(offset) {
            checksum = checksum.wrapping_sub(*val).wrapping_sub(1);
        }
    }
    checksum
}
