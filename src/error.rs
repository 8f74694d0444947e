//! Error types for the encoder.
//!
//! Every failure is raised synchronously and ends the encode call; no partially built symbol is
//! ever handed back.

/// Error type for when data exceeds QR code capacity.
///
/// Ways to handle this error include:
///
/// - Decrease the error correction level if it was greater than `QrCodeEcc::Low`.
/// - Increase the maximum version if it was less than `Version::MAX`.
/// - Split the text data into better segments to reduce the number of bits required.
/// - Change the text or binary data to be shorter.
/// - Propagate the error upward to the caller/user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataTooLong {
    /// A segment's character count does not fit in its count field at any allowed version.
    #[error("segment too long")]
    SegmentTooLong,

    /// Data length in bits exceeds the capacity of the largest allowed version.
    #[error("data length = {0} bits, max capacity = {1} bits")]
    DataOverCapacity(usize, usize),
}

/// A numeric argument or input character outside its valid range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidArgument {
    /// Version numbers are in [1, 40].
    #[error("version number {0} out of range")]
    VersionOutOfRange(u8),

    /// Mask numbers are in [0, 7].
    #[error("mask value {0} out of range")]
    MaskOutOfRange(u8),

    /// The minimum version is above the maximum version.
    #[error("invalid version range {min}..={max}")]
    VersionRange {
        /// Requested minimum version
        min: u8,
        /// Requested maximum version
        max: u8,
    },

    /// Reed-Solomon generator degree outside [1, 255].
    #[error("degree {0} out of range")]
    DegreeOutOfRange(usize),

    /// A character that numeric mode cannot encode.
    #[error("string contains non-numeric character {0:?}")]
    NonNumericCharacter(char),

    /// A character that alphanumeric mode cannot encode.
    #[error("string contains unencodable character {0:?} in alphanumeric mode")]
    NonAlphanumericCharacter(char),

    /// ECI assignment values are below 1 000 000.
    #[error("ECI assignment value {0} out of range")]
    EciOutOfRange(u32),

    /// The data codeword slice does not match the version/level capacity.
    #[error("expected {expected} data codewords, got {actual}")]
    CodewordCount {
        /// Capacity of the version/level
        expected: usize,
        /// Length supplied
        actual: usize,
    },
}

/// Main encoder error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QrError {
    /// The payload does not fit
    #[error("data too long: {0}")]
    DataTooLong(#[from] DataTooLong),

    /// An argument is outside its valid range
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
}

impl QrError {
    /// Check whether shortening the payload or lowering the ECC level could help.
    #[inline]
    #[must_use]
    pub fn is_capacity(&self) -> bool {
        matches!(self, Self::DataTooLong(_))
    }
}

/// Result alias used throughout the crate.
pub type QrResult<T> = Result<T, QrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_over_capacity() {
        let err: QrError = DataTooLong::DataOverCapacity(30_000, 23_648).into();
        assert_eq!(
            err.to_string(),
            "data too long: data length = 30000 bits, max capacity = 23648 bits"
        );
        assert!(err.is_capacity());
    }

    #[test]
    fn test_display_invalid_argument() {
        let err: QrError = InvalidArgument::MaskOutOfRange(9).into();
        assert_eq!(err.to_string(), "invalid argument: mask value 9 out of range");
        assert!(!err.is_capacity());
    }
}
