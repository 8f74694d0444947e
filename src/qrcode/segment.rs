use super::bits::BitBuffer;
use super::version::Version;
use crate::error::{InvalidArgument, QrResult};

/// A segment of data in a QR code.
///
/// Supports numeric, alphanumeric, byte and ECI modes. Segments are immutable and created using
/// factory functions like [`QrSegment::make_numeric`], [`QrSegment::make_alphanumeric`] or
/// [`QrSegment::make_bytes`]. The mode indicator and character count are not stored in the
/// payload; they are prepended when the segments are assembled into codewords.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QrSegment {
    mode: QrSegmentMode,
    numchars: usize,
    data: Vec<bool>,
}

impl QrSegment {
    /// Creates a segment for binary data in byte mode.
    pub fn make_bytes(data: &[u8]) -> Self {
        let mut bb = BitBuffer(Vec::with_capacity(data.len() * 8));
        for &b in data {
            bb.append_bits(u32::from(b), 8);
        }
        Self::new(QrSegmentMode::Byte, data.len(), bb.0)
    }

    /// Creates a segment for a string of decimal digits in numeric mode.
    ///
    /// Digits are packed three at a time into 10 bits; a trailing pair takes 7 bits and a
    /// trailing single digit 4 bits.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::NonNumericCharacter`] if `text` contains anything but `0`–`9`.
    pub fn make_numeric(text: &str) -> QrResult<Self> {
        let mut bb = BitBuffer::new();
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        for c in text.chars() {
            let digit = c.to_digit(10).ok_or(InvalidArgument::NonNumericCharacter(c))?;
            accumdata = accumdata * 10 + digit;
            accumcount += 1;
            if accumcount == 3 {
                bb.append_bits(accumdata, 10);
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            bb.append_bits(accumdata, accumcount * 3 + 1);
        }
        Ok(Self::new(QrSegmentMode::Numeric, text.len(), bb.0))
    }

    /// Creates a segment for alphanumeric text.
    ///
    /// Allowed characters: 0–9, A–Z (uppercase), space, `$`, `%`, `*`, `+`, `-`, `.`, `/`, `:`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::NonAlphanumericCharacter`] for any other character.
    pub fn make_alphanumeric(text: &str) -> QrResult<Self> {
        let mut bb = BitBuffer::new();
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        for c in text.chars() {
            let i = alphanumeric_index(c).ok_or(InvalidArgument::NonAlphanumericCharacter(c))?;
            accumdata = accumdata * 45 + i;
            accumcount += 1;
            if accumcount == 2 {
                bb.append_bits(accumdata, 11);
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            bb.append_bits(accumdata, 6);
        }
        Ok(Self::new(QrSegmentMode::Alphanumeric, text.len(), bb.0))
    }

    /// Returns zero or one segment representing the given text.
    ///
    /// Numeric mode is used when every character is a digit, alphanumeric mode when every
    /// character is in the 45-symbol alphabet, and byte mode (UTF-8) otherwise. Empty text
    /// gives an empty list.
    pub fn make_segments(text: &str) -> Vec<Self> {
        if text.is_empty() {
            return Vec::new();
        }
        let seg = match Self::classify(text) {
            QrSegmentMode::Numeric => Self::make_numeric(text).ok(),
            QrSegmentMode::Alphanumeric => Self::make_alphanumeric(text).ok(),
            _ => None,
        };
        vec![seg.unwrap_or_else(|| Self::make_bytes(text.as_bytes()))]
    }

    /// The mode [`QrSegment::make_segments`] picks for `text`.
    pub fn classify(text: &str) -> QrSegmentMode {
        if Self::is_numeric(text) {
            QrSegmentMode::Numeric
        } else if Self::is_alphanumeric(text) {
            QrSegmentMode::Alphanumeric
        } else {
            QrSegmentMode::Byte
        }
    }

    /// Payload bits of a `numchars`-character segment in `mode`, without headers.
    ///
    /// Returns `None` for ECI (its length depends on the value, not a count) or on overflow.
    pub fn packed_bits(mode: QrSegmentMode, numchars: usize) -> Option<usize> {
        match mode {
            QrSegmentMode::Numeric => {
                (numchars / 3).checked_mul(10)?.checked_add([0, 4, 7][numchars % 3])
            }
            QrSegmentMode::Alphanumeric => {
                (numchars / 2).checked_mul(11)?.checked_add(6 * (numchars % 2))
            }
            QrSegmentMode::Byte => numchars.checked_mul(8),
            QrSegmentMode::Eci => None,
        }
    }

    /// Creates a segment representing an Extended Channel Interpretation
    /// (ECI) designator with the given assignment value.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::EciOutOfRange`] for values of 1 000 000 or more.
    pub fn make_eci(assignval: u32) -> QrResult<Self> {
        let mut bb = BitBuffer::new();
        if assignval < 1 << 7 {
            bb.append_bits(assignval, 8);
        } else if assignval < 1 << 14 {
            bb.append_bits(0b10, 2);
            bb.append_bits(assignval, 14);
        } else if assignval < 1_000_000 {
            bb.append_bits(0b110, 3);
            bb.append_bits(assignval, 21);
        } else {
            return Err(InvalidArgument::EciOutOfRange(assignval).into());
        }
        Ok(Self::new(QrSegmentMode::Eci, 0, bb.0))
    }

    /// Creates a segment from already-packed payload bits.
    pub fn new(mode: QrSegmentMode, numchars: usize, data: Vec<bool>) -> Self {
        Self { mode, numchars, data }
    }

    pub fn mode(&self) -> QrSegmentMode {
        self.mode
    }

    /// Length of the source text in characters (bytes for byte mode).
    pub fn num_chars(&self) -> usize {
        self.numchars
    }

    /// The payload bits, without mode indicator or character count.
    pub fn data(&self) -> &[bool] {
        &self.data
    }

    pub fn bit_len(&self) -> usize {
        self.data.len()
    }

    /// Total bits needed to encode `segs` at `version`, headers included.
    ///
    /// Returns `None` if a character count does not fit its count field at this version, or
    /// the sum overflows.
    pub fn get_total_bits(segs: &[Self], version: Version) -> Option<usize> {
        let mut result: usize = 0;
        for seg in segs {
            let ccbits: u8 = seg.mode.num_char_count_bits(version);
            if let Some(limit) = 1usize.checked_shl(ccbits.into()) {
                if seg.numchars >= limit {
                    return None;
                }
            }
            result = result.checked_add(4 + usize::from(ccbits))?;
            result = result.checked_add(seg.data.len())?;
        }
        Some(result)
    }

    /// Appends mode indicator, character count and payload to `bb`.
    pub(crate) fn write_to(&self, bb: &mut BitBuffer, version: Version) {
        bb.append_bits(self.mode.mode_bits(), 4);
        // get_total_bits has already checked that the count fits the field.
        bb.append_bits(self.numchars as u32, self.mode.num_char_count_bits(version));
        bb.extend(self.data.iter().copied());
    }

    pub fn is_numeric(text: &str) -> bool {
        text.chars().all(|c| c.is_ascii_digit())
    }

    pub fn is_alphanumeric(text: &str) -> bool {
        text.chars().all(|c| ALPHANUMERIC_CHARSET.contains(c))
    }
}

static ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Position of `c` in the 45-symbol alphanumeric alphabet.
pub fn alphanumeric_index(c: char) -> Option<u32> {
    ALPHANUMERIC_CHARSET.find(c).map(|i| i as u32)
}

/// Describes how a segment's data bits are interpreted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum QrSegmentMode {
    Numeric,
    Alphanumeric,
    Byte,
    Eci,
}

impl QrSegmentMode {
    /// The 4-bit mode indicator.
    pub(crate) fn mode_bits(self) -> u32 {
        use QrSegmentMode::*;
        match self {
            Numeric => 0x1,
            Alphanumeric => 0x2,
            Byte => 0x4,
            Eci => 0x7,
        }
    }

    /// Width of the character count field at the given version.
    pub fn num_char_count_bits(self, ver: Version) -> u8 {
        use QrSegmentMode::*;
        (match self {
            Numeric => [10, 12, 14],
            Alphanumeric => [9, 11, 13],
            Byte => [8, 16, 16],
            Eci => [0, 0, 0],
        })[usize::from((ver.value() + 7) / 17)]
    }
}
