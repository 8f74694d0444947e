//! # qrsymbol
//!
//! A Rust library for encoding text or binary data into QR Code symbols.
//!
//! `qrsymbol` follows the QR Code Model 2 specification. It supports versions 1 to 40, the four
//! error correction levels, and numeric, alphanumeric, byte and ECI segments. Encoding is a pure
//! function of its inputs: every call owns its buffers, so symbols can be built from any number
//! of threads without locking.
//!
//! ## Pipeline
//!
//! 1. The text is classified into a segment (numeric, alphanumeric or UTF-8 bytes).
//! 2. The smallest version holding the segment bits at the requested error correction level is
//!    chosen, and the level is raised if that version has room for it.
//! 3. Segments, terminator and pad bytes are packed into data codewords.
//! 4. Reed-Solomon error correction codewords are computed per block and interleaved.
//! 5. Function patterns are drawn and the codeword bits placed in the zigzag order.
//! 6. The mask with the lowest penalty score (or the caller's mask) is applied.
//!
//! ## Example
//!
//! ```rust
//! use qrsymbol::{helper::to_svg_string, QrCode, QrCodeEcc};
//!
//! let qr = QrCode::encode_text("https://example.com", QrCodeEcc::Medium).unwrap();
//! assert_eq!(qr.size(), 4 * i32::from(qr.version().value()) + 17);
//! let svg = to_svg_string(&qr, 4);
//! assert!(svg.contains("<path"));
//! ```
//!
//! Generate an in-memory image buffer:
//!
//! ```rust
//! use qrsymbol::{helper::generate_image_buffer, QrCodeEcc};
//!
//! let img = generate_image_buffer("Hello, World!", QrCodeEcc::Low).unwrap();
//! assert_eq!(img.width(), img.height());
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: Core QR code encoding functionality.
//! - [`helper`]: Utilities for rendering QR codes in various formats.
//! - [`error`]: Error types returned by the encoder.

#![forbid(unsafe_code)]

pub mod error;
pub mod helper;
pub mod qrcode;

pub use error::{DataTooLong, InvalidArgument, QrError, QrResult};
pub use qrcode::{EncodeOptions, Mask, QrCode, QrCodeEcc, QrSegment, QrSegmentMode, Version};
