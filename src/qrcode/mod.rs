//! QR code encoding functionality.
//!
//! This module turns text or bytes into a QR Code Model 2 symbol: segments are built, the
//! smallest fitting version is chosen, codewords are assembled and protected with Reed-Solomon
//! error correction, and the modules are drawn and masked.

mod bits;
mod mask;
mod matrix;
mod reed_solomon;
mod segment;
mod version;

pub use bits::BitBuffer;
pub use mask::Mask;
pub use matrix::{format_bits, version_bits};
pub use reed_solomon::ReedSolomonGenerator;
pub use segment::{alphanumeric_index, QrSegment, QrSegmentMode};
pub use version::{QrCodeEcc, Version};

use crate::error::{DataTooLong, InvalidArgument, QrResult};
use matrix::MatrixBuilder;
use tracing::{debug, trace};

/// Parameters for an encode call.
///
/// # Example
///
/// ```rust
/// use qrsymbol::qrcode::{EncodeOptions, Mask, QrCode, QrCodeEcc, Version};
///
/// let options = EncodeOptions::new()
///     .ecl(QrCodeEcc::High)
///     .version_range(Version::new(2).unwrap(), Version::MAX)
///     .mask(Some(Mask::Diamonds));
/// let qr = QrCode::encode_text_with("CONTRACT-2024-0001", &options).unwrap();
/// assert_eq!(qr.mask(), Mask::Diamonds);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Minimum error correction level; may be boosted if `boost_ecl` is set.
    pub ecl: QrCodeEcc,
    /// Smallest version tried.
    pub min_version: Version,
    /// Largest version tried; input that does not fit here is rejected.
    pub max_version: Version,
    /// `None` selects the mask with the lowest penalty.
    pub mask: Option<Mask>,
    /// Raise `ecl` as far as the chosen version still holds the data.
    pub boost_ecl: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            ecl: QrCodeEcc::Medium,
            min_version: Version::MIN,
            max_version: Version::MAX,
            mask: None,
            boost_ecl: true,
        }
    }
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ecl(mut self, ecl: QrCodeEcc) -> Self {
        self.ecl = ecl;
        self
    }

    #[must_use]
    pub fn version_range(mut self, min: Version, max: Version) -> Self {
        self.min_version = min;
        self.max_version = max;
        self
    }

    #[must_use]
    pub fn mask(mut self, mask: Option<Mask>) -> Self {
        self.mask = mask;
        self
    }

    #[must_use]
    pub fn boost_ecl(mut self, boost: bool) -> Self {
        self.boost_ecl = boost;
        self
    }

    fn check_version_range(&self) -> QrResult<()> {
        if self.min_version > self.max_version {
            return Err(InvalidArgument::VersionRange {
                min: self.min_version.value(),
                max: self.max_version.value(),
            }
            .into());
        }
        Ok(())
    }
}

/// A QR Code symbol, representing a square grid of dark and light modules.
///
/// This struct supports QR Code Model 2, covering versions 1 to 40, all four error correction
/// levels, and the numeric, alphanumeric, byte and ECI segment modes. Instances are immutable
/// after creation.
///
/// # Creation
///
/// - High-level: use [`QrCode::encode_text`] or [`QrCode::encode_binary`].
/// - Mid-level: use [`QrCode::encode_segments`] or [`QrCode::encode_segments_with`].
/// - Low-level: construct from data codewords with [`QrCode::encode_codewords`].
///
/// # Example
///
/// ```rust
/// use qrsymbol::qrcode::{QrCode, QrCodeEcc};
///
/// let qr = QrCode::encode_text("Hello, World!", QrCodeEcc::Low).unwrap();
/// println!("Version: {}", qr.version().value());
/// assert_eq!(qr.size(), qr.version().size());
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrCode {
    version: Version,
    // Between 21 and 177 (inclusive); always version * 4 + 17
    size: i32,
    errorcorrectionlevel: QrCodeEcc,
    mask: Mask,
    // Row-major, true = dark
    modules: Vec<bool>,
}

impl QrCode {
    /// Encodes a text string at the given minimum error correction level.
    ///
    /// The smallest version is chosen automatically, the level is boosted when that costs no
    /// extra version, and the mask is chosen by penalty score.
    ///
    /// # Errors
    ///
    /// Returns [`DataTooLong`] if the text does not fit in a version 40 symbol at `ecl`.
    pub fn encode_text(text: &str, ecl: QrCodeEcc) -> QrResult<Self> {
        Self::encode_text_with(text, &EncodeOptions::new().ecl(ecl))
    }

    /// Encodes a text string with explicit options.
    pub fn encode_text_with(text: &str, options: &EncodeOptions) -> QrResult<Self> {
        if !text.is_empty() {
            // Numeric and alphanumeric text is ASCII, so the byte length is the character count
            Self::check_input_size(QrSegment::classify(text), text.len(), options)?;
        }
        let segs: Vec<QrSegment> = QrSegment::make_segments(text);
        Self::encode_segments_with(&segs, options)
    }

    /// Encodes binary data as a single byte-mode segment.
    ///
    /// # Errors
    ///
    /// Returns [`DataTooLong`] if the data does not fit in a version 40 symbol at `ecl`.
    pub fn encode_binary(data: &[u8], ecl: QrCodeEcc) -> QrResult<Self> {
        Self::encode_binary_with(data, &EncodeOptions::new().ecl(ecl))
    }

    /// Encodes binary data with explicit options.
    pub fn encode_binary_with(data: &[u8], options: &EncodeOptions) -> QrResult<Self> {
        Self::check_input_size(QrSegmentMode::Byte, data.len(), options)?;
        let segs: [QrSegment; 1] = [QrSegment::make_bytes(data)];
        Self::encode_segments_with(&segs, options)
    }

    /// Encodes a caller-built list of segments with default options and the given level.
    pub fn encode_segments(segs: &[QrSegment], ecl: QrCodeEcc) -> QrResult<Self> {
        Self::encode_segments_with(segs, &EncodeOptions::new().ecl(ecl))
    }

    /// Encodes the given segments.
    ///
    /// The smallest version within `options.min_version..=options.max_version` that holds the
    /// data is used. If `options.boost_ecl` is set, the error correction level is raised as far
    /// as that version allows.
    ///
    /// # Errors
    ///
    /// - [`InvalidArgument::VersionRange`] if the minimum version exceeds the maximum.
    /// - [`DataTooLong`] if the segments do not fit in the maximum version.
    pub fn encode_segments_with(segs: &[QrSegment], options: &EncodeOptions) -> QrResult<Self> {
        let (version, ecl, datausedbits) = Self::select_version(segs, options)?;
        let datacodewords = Self::assemble_codewords(segs, version, ecl, datausedbits);
        Self::encode_codewords(version, ecl, &datacodewords, options.mask)
    }

    /// Rejects a single-segment input that cannot fit `options.max_version` before it is packed.
    ///
    /// Reports the same error [`QrCode::select_version`] would give for the packed segment.
    fn check_input_size(mode: QrSegmentMode, numchars: usize, options: &EncodeOptions) -> QrResult<()> {
        options.check_version_range()?;
        let version = options.max_version;
        let ccbits: u8 = mode.num_char_count_bits(version);
        let databits: usize = match QrSegment::packed_bits(mode, numchars) {
            Some(bits) if numchars < 1usize << ccbits => bits,
            _ => return Err(DataTooLong::SegmentTooLong.into()),
        };
        let usedbits: usize = 4 + usize::from(ccbits) + databits;
        let capacitybits: usize = Self::data_capacity_bits(version, options.ecl);
        if usedbits > capacitybits {
            debug!(
                max_version = version.value(),
                ecl = ?options.ecl,
                used_bits = usedbits,
                capacity_bits = capacitybits,
                "input rejected before packing"
            );
            return Err(DataTooLong::DataOverCapacity(usedbits, capacitybits).into());
        }
        Ok(())
    }

    /// Picks the smallest fitting version, then the highest level that version still holds.
    fn select_version(
        segs: &[QrSegment],
        options: &EncodeOptions,
    ) -> QrResult<(Version, QrCodeEcc, usize)> {
        options.check_version_range()?;
        let (minversion, maxversion) = (options.min_version, options.max_version);

        let mut ecl = options.ecl;
        let mut version: Version = minversion;
        let datausedbits: usize = loop {
            let datacapacitybits: usize = version.num_data_codewords(ecl) * 8;
            let dataused: Option<usize> = QrSegment::get_total_bits(segs, version);
            match dataused {
                Some(n) if n <= datacapacitybits => break n,
                _ if version >= maxversion => {
                    debug!(
                        max_version = maxversion.value(),
                        ?ecl,
                        used_bits = ?dataused,
                        capacity_bits = datacapacitybits,
                        "data does not fit"
                    );
                    return Err(match dataused {
                        None => DataTooLong::SegmentTooLong,
                        Some(n) => DataTooLong::DataOverCapacity(n, datacapacitybits),
                    }
                    .into());
                }
                _ => {}
            }
            version = match version.next() {
                Some(next) => next,
                None => return Err(DataTooLong::SegmentTooLong.into()),
            };
        };

        // Increase the error correction level while the data still fits
        let requested = ecl;
        if options.boost_ecl {
            for newecl in [QrCodeEcc::Medium, QrCodeEcc::Quartile, QrCodeEcc::High] {
                if newecl > ecl && datausedbits <= version.num_data_codewords(newecl) * 8 {
                    ecl = newecl;
                }
            }
        }
        debug!(
            version = version.value(),
            ?requested,
            ?ecl,
            used_bits = datausedbits,
            capacity_bits = version.num_data_codewords(ecl) * 8,
            "selected version"
        );
        Ok((version, ecl, datausedbits))
    }

    /// Concatenates the segments, adds the terminator and pads to the exact data capacity.
    fn assemble_codewords(
        segs: &[QrSegment],
        version: Version,
        ecl: QrCodeEcc,
        datausedbits: usize,
    ) -> Vec<u8> {
        let datacapacitybits: usize = version.num_data_codewords(ecl) * 8;
        let mut bb = BitBuffer(Vec::with_capacity(datacapacitybits));
        for seg in segs {
            seg.write_to(&mut bb, version);
        }
        debug_assert_eq!(bb.len(), datausedbits);
        debug_assert!(bb.len() <= datacapacitybits);

        // Add terminator and pad up to a byte if applicable
        let numzerobits: usize = std::cmp::min(4, datacapacitybits - bb.len());
        bb.append_bits(0, numzerobits as u8);
        let numzerobits: usize = bb.len().wrapping_neg() & 7;
        bb.append_bits(0, numzerobits as u8);
        debug_assert_eq!(bb.len() % 8, 0);

        // Pad with alternating bytes until data capacity is reached
        for &padbyte in [0xEC, 0x11].iter().cycle() {
            if bb.len() >= datacapacitybits {
                break;
            }
            bb.append_bits(padbyte, 8);
        }
        let datacodewords = bb.to_bytes();
        debug!(count = datacodewords.len(), "assembled data codewords");
        datacodewords
    }

    /// Creates a QR Code from already-assembled data codewords.
    ///
    /// This is a low-level API that most users should not use directly. `datacodewords` must
    /// hold exactly `version.num_data_codewords(ecl)` bytes. With `mask` set to `None` every
    /// pattern is scored and the lowest penalty wins; otherwise the given mask is used as is.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::CodewordCount`] if the slice has the wrong length.
    pub fn encode_codewords(
        version: Version,
        ecl: QrCodeEcc,
        datacodewords: &[u8],
        mask: Option<Mask>,
    ) -> QrResult<Self> {
        // Compute ECC, draw modules
        let allcodewords: Vec<u8> = reed_solomon::add_ecc_and_interleave(datacodewords, version, ecl)?;
        let mut matrix = MatrixBuilder::new(version, ecl);
        matrix.draw_codewords(&allcodewords);

        // Do masking
        let mask: Mask = match mask {
            Some(mask) => {
                debug!(mask = mask.value(), "using explicit mask");
                mask
            }
            None => Self::choose_mask(&mut matrix, ecl),
        };
        matrix.apply_mask(mask);
        matrix.draw_format_bits(ecl, mask);

        Ok(Self {
            version,
            size: matrix.size(),
            errorcorrectionlevel: ecl,
            mask,
            modules: matrix.into_modules(),
        })
    }

    /// Scores every mask on `matrix` and returns the one with the lowest penalty.
    /// The matrix is left unmasked.
    fn choose_mask(matrix: &mut MatrixBuilder, ecl: QrCodeEcc) -> Mask {
        let mut best = Mask::Checkerboard;
        let mut minpenalty = i32::MAX;
        for candidate in Mask::ALL {
            matrix.apply_mask(candidate);
            matrix.draw_format_bits(ecl, candidate);
            let penalty: i32 = mask::penalty_score(matrix.modules(), matrix.size());
            trace!(mask = candidate.value(), penalty, "scored mask");
            if penalty < minpenalty {
                best = candidate;
                minpenalty = penalty;
            }
            matrix.apply_mask(candidate); // Undoes the mask due to XOR
        }
        debug!(mask = best.value(), penalty = minpenalty, "chose mask");
        best
    }

    /// Returns this QR Code's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns this QR Code's size, in the range [21, 177].
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Returns this QR Code's error correction level.
    pub fn error_correction_level(&self) -> QrCodeEcc {
        self.errorcorrectionlevel
    }

    /// Returns this QR Code's mask, in the range [0, 7].
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Returns the color of the module at the given coordinates.
    ///
    /// Returns `true` for dark modules and `false` for light modules. Coordinates outside the QR
    /// code's bounds return `false`.
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        let range = 0..self.size;
        range.contains(&x) && range.contains(&y) && self.modules[(y * self.size + x) as usize]
    }

    /// Number of data bits a symbol of `version` holds at `ecl`.
    pub fn data_capacity_bits(version: Version, ecl: QrCodeEcc) -> usize {
        version.num_data_codewords(ecl) * 8
    }
}
