//! Versions, error correction levels and the capacity tables that tie them together.

use crate::error::{InvalidArgument, QrResult};

/// A QR code version (1–40).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::VersionOutOfRange`] if the number is outside [1, 40].
    pub fn new(ver: u8) -> QrResult<Self> {
        if (Self::MIN.0..=Self::MAX.0).contains(&ver) {
            Ok(Self(ver))
        } else {
            Err(InvalidArgument::VersionOutOfRange(ver).into())
        }
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Side length of a symbol of this version, in modules: `4 * version + 17`.
    pub const fn size(self) -> i32 {
        (self.0 as i32) * 4 + 17
    }

    /// The next version up, or `None` past version 40.
    pub(crate) fn next(self) -> Option<Self> {
        (self.0 < Self::MAX.0).then(|| Self(self.0 + 1))
    }

    /// Whether this version embeds the two 18-bit version information blocks.
    pub const fn has_version_info(self) -> bool {
        self.0 >= 7
    }

    /// Centre coordinates of the alignment patterns, in ascending order.
    ///
    /// Version 1 has none. Each coordinate is used both as a row and as a column.
    pub fn alignment_pattern_positions(self) -> Vec<i32> {
        let ver = i32::from(self.0);
        if ver == 1 {
            return Vec::new();
        }
        let numalign = ver / 7 + 2;
        let step = if ver == 32 {
            26
        } else {
            (ver * 4 + numalign * 2 + 1) / (numalign * 2 - 2) * 2
        };
        let mut result: Vec<i32> = (0..numalign - 1).map(|i| self.size() - 7 - i * step).collect();
        result.push(6);
        result.reverse();
        result
    }

    /// Number of data modules available once every function pattern is drawn.
    ///
    /// Includes remainder bits, so the result need not be a multiple of 8.
    pub(crate) fn num_raw_data_modules(self) -> usize {
        let ver = usize::from(self.0);
        let mut result: usize = (16 * ver + 128) * ver + 64;
        if ver >= 2 {
            let numalign: usize = ver / 7 + 2;
            result -= (25 * numalign - 10) * numalign - 55;
            if ver >= 7 {
                result -= 36;
            }
        }
        result
    }

    /// Total number of 8-bit codewords (data and ECC) the symbol holds.
    pub(crate) fn num_raw_codewords(self) -> usize {
        self.num_raw_data_modules() / 8
    }

    /// Number of data codewords available at the given error correction level.
    pub fn num_data_codewords(self, ecl: QrCodeEcc) -> usize {
        self.num_raw_codewords() - self.ecc_codewords_per_block(ecl) * self.num_ecc_blocks(ecl)
    }

    pub(crate) fn ecc_codewords_per_block(self, ecl: QrCodeEcc) -> usize {
        table_get(&ECC_CODEWORDS_PER_BLOCK, self, ecl)
    }

    pub(crate) fn num_ecc_blocks(self, ecl: QrCodeEcc) -> usize {
        table_get(&NUM_ERROR_CORRECTION_BLOCKS, self, ecl)
    }
}

impl TryFrom<u8> for Version {
    type Error = crate::error::QrError;

    fn try_from(ver: u8) -> QrResult<Self> {
        Self::new(ver)
    }
}

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum QrCodeEcc {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    #[default]
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl QrCodeEcc {
    /// Row index into the capacity tables.
    fn ordinal(self) -> usize {
        use QrCodeEcc::*;
        match self {
            Low => 0,
            Medium => 1,
            Quartile => 2,
            High => 3,
        }
    }

    /// Returns the 2-bit value written into the format information field.
    pub(crate) fn format_bits(self) -> u8 {
        use QrCodeEcc::*;
        match self {
            Low => 1,
            Medium => 0,
            Quartile => 3,
            High => 2,
        }
    }
}

fn table_get(table: &'static [[i8; 41]; 4], ver: Version, ecl: QrCodeEcc) -> usize {
    let value = table[ecl.ordinal()][usize::from(ver.value())];
    debug_assert!(value > 0);
    value as usize
}

// Index: [ecl][version]. Column 0 is padding so versions index directly.
static ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30,
        30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

static NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];
