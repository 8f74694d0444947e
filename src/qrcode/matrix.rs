//! Drawing of the module grid: function patterns, format/version information and data placement.

use super::bits::get_bit;
use super::mask::Mask;
use super::version::{QrCodeEcc, Version};

/// A symbol under construction.
///
/// Owns the module grid together with the is-function overlay that marks structural modules.
/// The overlay never leaves the builder; [`MatrixBuilder::into_modules`] drops it.
pub(crate) struct MatrixBuilder {
    version: Version,
    size: i32,
    modules: Vec<bool>,
    isfunction: Vec<bool>,
}

impl MatrixBuilder {
    /// Allocates an all-light grid for `version` and draws every function pattern.
    ///
    /// Format bits are drawn with a dummy mask; they are rewritten once the mask is known.
    pub fn new(version: Version, ecl: QrCodeEcc) -> Self {
        let size = version.size();
        let n = (size * size) as usize;
        let mut result = Self {
            version,
            size,
            modules: vec![false; n],
            isfunction: vec![false; n],
        };
        result.draw_function_patterns(ecl);
        result
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn modules(&self) -> &[bool] {
        &self.modules
    }

    /// Consumes the builder, discarding the function overlay.
    pub fn into_modules(self) -> Vec<bool> {
        self.modules
    }

    #[cfg(test)]
    pub fn module(&self, x: i32, y: i32) -> bool {
        self.modules[self.index(x, y)]
    }

    pub fn is_function(&self, x: i32, y: i32) -> bool {
        self.isfunction[self.index(x, y)]
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.size + x) as usize
    }

    fn set_function_module(&mut self, x: i32, y: i32, isdark: bool) {
        let i = self.index(x, y);
        self.modules[i] = isdark;
        self.isfunction[i] = true;
    }

    fn draw_function_patterns(&mut self, ecl: QrCodeEcc) {
        // Timing patterns
        let size: i32 = self.size;
        for i in 0..size {
            self.set_function_module(6, i, i % 2 == 0);
            self.set_function_module(i, 6, i % 2 == 0);
        }

        // Finder patterns, drawn over the timing patterns
        self.draw_finder_pattern(3, 3);
        self.draw_finder_pattern(size - 4, 3);
        self.draw_finder_pattern(3, size - 4);

        // Alignment patterns, except at the three finder corners
        let alignpatpos: Vec<i32> = self.version.alignment_pattern_positions();
        let last = alignpatpos.len().saturating_sub(1);
        for (i, &pos0) in alignpatpos.iter().enumerate() {
            for (j, &pos1) in alignpatpos.iter().enumerate() {
                let corner = (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0);
                if !corner {
                    self.draw_alignment_pattern(pos0, pos1);
                }
            }
        }

        self.draw_format_bits(ecl, Mask::Checkerboard);
        self.draw_version();
    }

    /// Draws a 9x9 finder pattern (including the light separator) centred at (x, y).
    /// Modules that fall outside the grid are skipped.
    fn draw_finder_pattern(&mut self, x: i32, y: i32) {
        for dy in -4..=4 {
            for dx in -4..=4 {
                let xx: i32 = x + dx;
                let yy: i32 = y + dy;
                if (0..self.size).contains(&xx) && (0..self.size).contains(&yy) {
                    let dist: i32 = dx.abs().max(dy.abs());
                    self.set_function_module(xx, yy, dist != 2 && dist != 4);
                }
            }
        }
    }

    /// Draws a 5x5 alignment pattern centred at (x, y).
    fn draw_alignment_pattern(&mut self, x: i32, y: i32) {
        for dy in -2..=2 {
            for dx in -2..=2 {
                self.set_function_module(x + dx, y + dy, dx.abs().max(dy.abs()) != 1);
            }
        }
    }

    /// Draws both copies of the 15-bit format information.
    pub fn draw_format_bits(&mut self, ecl: QrCodeEcc, mask: Mask) {
        let bits: u32 = format_bits(ecl, mask);

        // First copy, around the top-left finder
        for i in 0..6 {
            self.set_function_module(8, i, get_bit(bits, i as u8));
        }
        self.set_function_module(8, 7, get_bit(bits, 6));
        self.set_function_module(8, 8, get_bit(bits, 7));
        self.set_function_module(7, 8, get_bit(bits, 8));
        for i in 9..15 {
            self.set_function_module(14 - i, 8, get_bit(bits, i as u8));
        }

        // Second copy, split between the other two finders
        let size: i32 = self.size;
        for i in 0..8 {
            self.set_function_module(size - 1 - i, 8, get_bit(bits, i as u8));
        }
        for i in 8..15 {
            self.set_function_module(8, size - 15 + i, get_bit(bits, i as u8));
        }
        self.set_function_module(8, size - 8, true); // Always dark
    }

    /// Draws both copies of the version information, for versions 7 and up.
    fn draw_version(&mut self) {
        if !self.version.has_version_info() {
            return;
        }
        let bits: u32 = version_bits(self.version);
        for i in 0..18u8 {
            let bit: bool = get_bit(bits, i);
            let a: i32 = self.size - 11 + i32::from(i % 3);
            let b: i32 = i32::from(i / 3);
            self.set_function_module(a, b, bit);
            self.set_function_module(b, a, bit);
        }
    }

    /// Places the interleaved codewords into the data area in the zigzag order.
    ///
    /// `data` must hold exactly the raw codeword count of the version. Remainder modules stay
    /// light.
    pub fn draw_codewords(&mut self, data: &[u8]) {
        debug_assert_eq!(data.len(), self.version.num_raw_codewords());
        let size: i32 = self.size;
        let totalbits = data.len() * 8;
        let mut i: usize = 0;
        // Two-column bands, right to left
        let mut right: i32 = size - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            for vert in 0..size {
                for j in 0..2 {
                    let x: i32 = right - j;
                    let upward: bool = ((right + 1) & 2) == 0;
                    let y: i32 = if upward { size - 1 - vert } else { vert };
                    if !self.is_function(x, y) && i < totalbits {
                        let idx = self.index(x, y);
                        self.modules[idx] = get_bit(u32::from(data[i >> 3]), 7 - (i & 7) as u8);
                        i += 1;
                    }
                }
            }
            right -= 2;
        }
        debug_assert_eq!(i, totalbits);
    }

    /// XORs `mask` into every non-function module. Applying the same mask twice undoes it.
    pub fn apply_mask(&mut self, mask: Mask) {
        for y in 0..self.size {
            for x in 0..self.size {
                let idx = self.index(x, y);
                if !self.isfunction[idx] {
                    self.modules[idx] ^= mask.invert(x, y);
                }
            }
        }
    }
}

/// The 15-bit format word: level and mask bits, BCH(15,5) remainder, XOR mask `0x5412`.
pub fn format_bits(ecl: QrCodeEcc, mask: Mask) -> u32 {
    let data = u32::from((ecl.format_bits() << 3) | mask.value());
    let mut rem: u32 = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
    }
    ((data << 10) | rem) ^ 0x5412
}

/// The 18-bit version word: version number and BCH(18,6) remainder.
pub fn version_bits(ver: Version) -> u32 {
    let ver = u32::from(ver.value());
    let mut rem: u32 = ver;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * 0x1f25);
    }
    (ver << 12) | rem
}
