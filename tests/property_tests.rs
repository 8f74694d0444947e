use proptest::prelude::*;
use qrsymbol::qrcode::{EncodeOptions, Mask, QrCode, QrCodeEcc};

fn any_ecl() -> impl Strategy<Value = QrCodeEcc> {
    prop_oneof![
        Just(QrCodeEcc::Low),
        Just(QrCodeEcc::Medium),
        Just(QrCodeEcc::Quartile),
        Just(QrCodeEcc::High),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn encodes_any_short_text(text in "\\PC{0,120}", ecl in any_ecl()) {
        let qr = QrCode::encode_text(&text, ecl).unwrap();
        prop_assert_eq!(qr.size(), 4 * i32::from(qr.version().value()) + 17);
        prop_assert!(qr.error_correction_level() >= ecl);
    }

    #[test]
    fn encoding_is_deterministic(text in "[ -~]{0,80}", mask in proptest::option::of(0u8..8)) {
        let mask = mask.map(|m| Mask::new(m).unwrap());
        let options = EncodeOptions::new().mask(mask);
        let a = QrCode::encode_text_with(&text, &options).unwrap();
        let b = QrCode::encode_text_with(&text, &options).unwrap();
        prop_assert_eq!(&a, &b);
        if let Some(mask) = mask {
            prop_assert_eq!(a.mask(), mask);
        }
    }

    #[test]
    fn finder_corners_always_dark(text in "[0-9A-Z]{1,60}") {
        let qr = QrCode::encode_text(&text, QrCodeEcc::Medium).unwrap();
        let far = qr.size() - 1;
        prop_assert!(qr.get_module(0, 0));
        prop_assert!(qr.get_module(far, 0));
        prop_assert!(qr.get_module(0, far));
        prop_assert!(!qr.get_module(7, 7));
    }
}
