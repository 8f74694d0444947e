use criterion::{black_box, criterion_group, criterion_main, Criterion};
use qrsymbol::helper::to_svg_string;
use qrsymbol::qrcode::{EncodeOptions, Mask, QrCode, QrCodeEcc};

fn bench_encode_short(c: &mut Criterion) {
    c.bench_function("encode_text_short", |b| {
        b.iter(|| QrCode::encode_text(black_box("https://example.com/contracts/42"), QrCodeEcc::Medium))
    });
}

fn bench_encode_numeric(c: &mut Criterion) {
    let digits = "0123456789".repeat(50);
    c.bench_function("encode_text_numeric_500", |b| {
        b.iter(|| QrCode::encode_text(black_box(&digits), QrCodeEcc::Quartile))
    });
}

fn bench_encode_max_version(c: &mut Criterion) {
    let data = vec![0x5Au8; 2900];
    c.bench_function("encode_binary_v40", |b| {
        b.iter(|| QrCode::encode_binary(black_box(&data), QrCodeEcc::Low))
    });
}

fn bench_explicit_mask(c: &mut Criterion) {
    let data = vec![0x5Au8; 2900];
    let options = EncodeOptions::new().ecl(QrCodeEcc::Low).mask(Some(Mask::Checkerboard));
    c.bench_function("encode_binary_v40_fixed_mask", |b| {
        b.iter(|| QrCode::encode_binary_with(black_box(&data), &options))
    });
}

fn bench_svg(c: &mut Criterion) {
    let qr = QrCode::encode_text("https://example.com/contracts/42", QrCodeEcc::Medium).unwrap();
    c.bench_function("to_svg_string", |b| b.iter(|| to_svg_string(black_box(&qr), 4)));
}

criterion_group!(
    benches,
    bench_encode_short,
    bench_encode_numeric,
    bench_encode_max_version,
    bench_explicit_mask,
    bench_svg
);
criterion_main!(benches);
