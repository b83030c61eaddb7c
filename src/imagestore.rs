// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Output image: append-only byte buffer with backpatch support.

use std::io::{self, Write};

/// The binary image being assembled.
///
/// Bytes are only ever appended during pass 1; the cursor is the image
/// length and doubles as the load address of the next byte (code is
/// assumed to start at offset 0). Pass 2 overwrites previously emitted
/// placeholder bytes in place through `patch`.
#[derive(Debug, Default)]
pub struct ImageStore {
    bytes: Vec<u8>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Current cursor, equal to the number of bytes emitted so far.
    pub fn position(&self) -> u32 {
        self.bytes.len() as u32
    }

    pub fn emit(&mut self, val: u8) {
        self.bytes.push(val);
    }

    pub fn emit_slice(&mut self, values: &[u8]) {
        self.bytes.extend_from_slice(values);
    }

    /// Emit a 16-bit value little-endian.
    pub fn emit_word(&mut self, val: u16) {
        self.bytes.push((val & 0xff) as u8);
        self.bytes.push((val >> 8) as u8);
    }

    /// Zero-fill until the cursor reaches `target`. The caller checks that
    /// the target has not already been passed.
    pub fn pad_to(&mut self, target: u32) {
        while self.position() < target {
            self.bytes.push(0x00);
        }
    }

    /// Overwrite previously emitted bytes at `offset`. Reference sites are
    /// patched exactly once, over placeholder zeros.
    pub fn patch(&mut self, offset: u32, values: &[u8]) {
        let start = offset as usize;
        debug_assert!(start + values.len() <= self.bytes.len());
        for (ix, val) in values.iter().enumerate() {
            self.bytes[start + ix] = *val;
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn write_bin_file<W: Write>(&self, mut out: W) -> io::Result<()> {
        out.write_all(&self.bytes)
    }
}
