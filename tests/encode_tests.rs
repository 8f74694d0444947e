use qrsymbol::qrcode::{EncodeOptions, Mask, QrCode, QrCodeEcc, QrSegment, Version};
use qrsymbol::{DataTooLong, QrError};

fn grid(qr: &QrCode) -> Vec<bool> {
    (0..qr.size())
        .flat_map(|y| (0..qr.size()).map(move |x| (x, y)))
        .map(|(x, y)| qr.get_module(x, y))
        .collect()
}

#[test]
fn test_empty_text_encodes() {
    let qr = QrCode::encode_text("", QrCodeEcc::Low).unwrap();
    assert_eq!(qr.version(), Version::MIN);
    assert_eq!(qr.size(), 21);
    // Nothing to protect, so the level is boosted all the way
    assert_eq!(qr.error_correction_level(), QrCodeEcc::High);
}

#[test]
fn test_hello_world_symbol() {
    let qr = QrCode::encode_text("HELLO WORLD", QrCodeEcc::Medium).unwrap();
    assert_eq!(qr.version(), Version::MIN);
    assert_eq!(qr.error_correction_level(), QrCodeEcc::Quartile);
    assert_eq!(qr.size(), 21);
}

#[test]
fn test_format_bits_match_symbol() {
    let qr = QrCode::encode_text("HELLO WORLD", QrCodeEcc::Medium).unwrap();
    let bits = qrsymbol::qrcode::format_bits(qr.error_correction_level(), qr.mask());
    // Second copy along the bottom of column 8 holds bits 8..15
    for i in 8..15 {
        let expected = (bits >> i) & 1 == 1;
        assert_eq!(qr.get_module(8, qr.size() - 15 + i), expected, "bit {}", i);
    }
    assert!(qr.get_module(8, qr.size() - 8));
}

#[test]
fn test_version_info_drawn_from_version_7() {
    let options = EncodeOptions::new().version_range(Version::new(7).unwrap(), Version::MAX);
    let qr = QrCode::encode_text_with("7", &options).unwrap();
    assert_eq!(qr.version().value(), 7);
    let bits = qrsymbol::qrcode::version_bits(qr.version());
    for i in 0..18 {
        let expected = (bits >> i) & 1 == 1;
        let a = qr.size() - 11 + (i % 3) as i32;
        let b = (i / 3) as i32;
        assert_eq!(qr.get_module(a, b), expected);
        assert_eq!(qr.get_module(b, a), expected);
    }
}

#[test]
fn test_size_matches_version() {
    for len in [0usize, 10, 100, 500, 1000, 2000] {
        let text = "x".repeat(len);
        let qr = QrCode::encode_text(&text, QrCodeEcc::Low).unwrap();
        assert_eq!(qr.size(), 4 * i32::from(qr.version().value()) + 17);
    }
}

#[test]
fn test_deterministic() {
    let text = "{\"contract\":\"C-1042\",\"party\":\"ACME\"}";
    let a = QrCode::encode_text(text, QrCodeEcc::Medium).unwrap();
    let b = QrCode::encode_text(text, QrCodeEcc::Medium).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.mask(), b.mask());
}

#[test]
fn test_explicit_mask_is_used() {
    let text = "https://example.com/contracts/42";
    for mask in Mask::ALL {
        let options = EncodeOptions::new().mask(Some(mask));
        let qr = QrCode::encode_text_with(text, &options).unwrap();
        assert_eq!(qr.mask(), mask);
    }
}

#[test]
fn test_explicit_mask_matches_automatic_choice() {
    let text = "https://example.com/contracts/42";
    let auto = QrCode::encode_text(text, QrCodeEcc::Medium).unwrap();
    let forced = QrCode::encode_text_with(text, &EncodeOptions::new().mask(Some(auto.mask()))).unwrap();
    assert_eq!(auto, forced);
}

#[test]
fn test_different_masks_give_different_grids() {
    let text = "MASKS";
    let a = QrCode::encode_text_with(text, &EncodeOptions::new().mask(Some(Mask::Checkerboard))).unwrap();
    let b = QrCode::encode_text_with(text, &EncodeOptions::new().mask(Some(Mask::Meadow))).unwrap();
    assert_ne!(grid(&a), grid(&b));
}

#[test]
fn test_byte_capacity_limit_at_low() {
    let data = vec![b'a'; 2953];
    let qr = QrCode::encode_binary(&data, QrCodeEcc::Low).unwrap();
    assert_eq!(qr.version(), Version::MAX);
    let err = QrCode::encode_binary(&[b'a'; 2954], QrCodeEcc::Low).unwrap_err();
    assert!(err.is_capacity());
}

#[test]
fn test_overflow_at_high() {
    let data = vec![0xA5u8; 1274];
    let err = QrCode::encode_binary(&data, QrCodeEcc::High).unwrap_err();
    assert_eq!(
        err,
        QrError::DataTooLong(DataTooLong::DataOverCapacity(4 + 16 + 1274 * 8, 1276 * 8))
    );
    assert!(QrCode::encode_binary(&data[..1273], QrCodeEcc::High).is_ok());
}

#[test]
fn test_text_capacity_limits_at_low() {
    let digits = "7".repeat(7089);
    assert_eq!(QrCode::encode_text(&digits, QrCodeEcc::Low).unwrap().version(), Version::MAX);
    let err = QrCode::encode_text(&"7".repeat(7090), QrCodeEcc::Low).unwrap_err();
    assert_eq!(err, QrError::DataTooLong(DataTooLong::DataOverCapacity(23652, 23648)));

    assert!(QrCode::encode_text(&"Z".repeat(4296), QrCodeEcc::Low).is_ok());
    assert!(QrCode::encode_text(&"Z".repeat(4297), QrCodeEcc::Low).unwrap_err().is_capacity());
}

#[test]
fn test_huge_input_is_rejected() {
    let text = "x".repeat(1 << 20);
    let err = QrCode::encode_text(&text, QrCodeEcc::Low).unwrap_err();
    assert_eq!(err, QrError::DataTooLong(DataTooLong::SegmentTooLong));
    let err = QrCode::encode_binary(text.as_bytes(), QrCodeEcc::Low).unwrap_err();
    assert_eq!(err, QrError::DataTooLong(DataTooLong::SegmentTooLong));
}

#[test]
fn test_mixed_segments() {
    let segs = vec![
        QrSegment::make_alphanumeric("CONTRACT ").unwrap(),
        QrSegment::make_numeric("000123456").unwrap(),
        QrSegment::make_bytes("ü".as_bytes()),
    ];
    let qr = QrCode::encode_segments(&segs, QrCodeEcc::Low).unwrap();
    assert_eq!(qr.version(), Version::MIN);
}

#[test]
fn test_eci_segment_encodes() {
    let segs = vec![QrSegment::make_eci(26).unwrap(), QrSegment::make_bytes("€".as_bytes())];
    assert!(QrCode::encode_segments(&segs, QrCodeEcc::Medium).is_ok());
}

#[test]
fn test_version_range_limits_growth() {
    let options = EncodeOptions::new()
        .ecl(QrCodeEcc::Low)
        .version_range(Version::MIN, Version::new(2).unwrap());
    let err = QrCode::encode_text_with(&"z".repeat(100), &options).unwrap_err();
    assert!(err.is_capacity());
}

#[test]
fn test_numeric_is_denser_than_bytes() {
    let digits = "1".repeat(41);
    let qr = QrCode::encode_text(&digits, QrCodeEcc::Low).unwrap();
    // 41 digits fill version 1-L exactly in numeric mode
    assert_eq!(qr.version(), Version::MIN);
    let qr = QrCode::encode_binary(digits.as_bytes(), QrCodeEcc::Low).unwrap();
    assert!(qr.version() > Version::MIN);
}
