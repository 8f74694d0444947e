use crate::error::QrResult;
use crate::qrcode::{QrCode, QrCodeEcc};

use image::error::{ImageError, LimitError, LimitErrorKind};
use image::{GrayImage, ImageBuffer, Luma};
use std::fs;
use std::path::Path;

/*---- Utilities ----*/

/// Default quiet zone width, in modules.
pub const DEFAULT_BORDER: u32 = 4;

/// Maximal horizontal runs of dark modules in row `y`, as `(start_x, length)` pairs.
fn dark_runs(qr: &QrCode, y: i32) -> impl Iterator<Item = (i32, i32)> + '_ {
    let size = qr.size();
    let mut x = 0;
    std::iter::from_fn(move || {
        while x < size && !qr.get_module(x, y) {
            x += 1;
        }
        if x >= size {
            return None;
        }
        let start = x;
        while x < size && qr.get_module(x, y) {
            x += 1;
        }
        Some((start, x - start))
    })
}

/// Returns a string of SVG code for an image depicting
/// the given QR Code, with the given number of border modules.
///
/// Each row's maximal runs of dark modules become one rectangle in a single path.
/// The string always uses Unix newlines (\n), regardless of the platform.
pub fn to_svg_string(qr: &QrCode, border: u32) -> String {
    // i64 holds any border without truncation
    let border = i64::from(border);
    let dimension = i64::from(qr.size()) + border * 2;
    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n",
        dimension
    );
    result += "\t<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n";
    let mut path: Vec<String> = Vec::new();
    for y in 0..qr.size() {
        for (x, len) in dark_runs(qr, y) {
            path.push(format!(
                "M{},{}h{}v1h-{}z",
                i64::from(x) + border,
                i64::from(y) + border,
                len,
                len
            ));
        }
    }
    result += &format!("\t<path d=\"{}\" fill=\"#000000\"/>\n", path.join(" "));
    result += "</svg>\n";
    result
}

/// Renders the QR Code with block characters, two per module so the output stays square.
pub fn to_console_string(qr: &QrCode, border: u32) -> String {
    let border = i64::from(border);
    let size = i64::from(qr.size());
    let dark = |x: i64, y: i64| match (i32::try_from(x), i32::try_from(y)) {
        (Ok(x), Ok(y)) => qr.get_module(x, y),
        _ => false,
    };
    let mut result = String::new();
    for y in -border..size + border {
        for x in -border..size + border {
            let c: char = if dark(x, y) { '█' } else { ' ' };
            result.push(c);
            result.push(c);
        }
        result.push('\n');
    }
    result
}

/// Prints the given QrCode object to the console.
pub fn print_qr(qr: &QrCode) {
    println!("{}", to_console_string(qr, DEFAULT_BORDER));
}

/// Converts a QR Code to a grayscale image with a light quiet zone.
///
/// # Arguments
///
/// * `qr` - The QR Code to convert.
/// * `border` - Quiet zone width in modules.
/// * `scale` - Pixels per module; `0` is treated as `1`.
///
/// # Errors
///
/// Returns an `ImageError::Limits` dimension error if the side length does not fit in a `u32`.
pub fn to_image_buffer(qr: &QrCode, border: u32, scale: u32) -> Result<GrayImage, ImageError> {
    let scale = scale.max(1);
    let side = image_side(qr, border, scale).ok_or_else(|| {
        ImageError::Limits(LimitError::from_kind(LimitErrorKind::DimensionError))
    })?;
    Ok(render_image(qr, border, scale, side))
}

/// Side length in pixels, or `None` on overflow.
fn image_side(qr: &QrCode, border: u32, scale: u32) -> Option<u32> {
    let modules = u32::try_from(qr.size()).ok()?.checked_add(border.checked_mul(2)?)?;
    modules.checked_mul(scale)
}

/// Draws `qr` into a `side` x `side` image; `side` must come from [`image_side`].
fn render_image(qr: &QrCode, border: u32, scale: u32, side: u32) -> GrayImage {
    let mut img: GrayImage = ImageBuffer::from_pixel(side, side, Luma([255u8]));

    for y in 0..qr.size() {
        for (x, len) in dark_runs(qr, y) {
            let top = (y as u32 + border) * scale;
            let left = (x as u32 + border) * scale;
            for py in top..top + scale {
                for px in left..left + len as u32 * scale {
                    img.put_pixel(px, py, Luma([0u8]));
                }
            }
        }
    }
    img
}

/// Converts a QR Code to an image and saves it to `path`.
///
/// Missing parent directories are created. The format is taken from the file extension.
///
/// # Errors
///
/// Returns an `image::ImageError` if the directory cannot be created or the image cannot be
/// written.
///
/// # Example
///
/// ```no_run
/// use qrsymbol::helper::save_image;
/// use qrsymbol::{QrCode, QrCodeEcc};
///
/// let qr = QrCode::encode_text("Hello, World!", QrCodeEcc::Low).unwrap();
/// save_image(&qr, "images/qr_code.png", 4, 8).unwrap();
/// ```
pub fn save_image<P: AsRef<Path>>(
    qr: &QrCode,
    path: P,
    border: u32,
    scale: u32,
) -> Result<(), image::ImageError> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    to_image_buffer(qr, border, scale)?.save(path)
}

/// Generates a QR Code SVG from the provided content.
///
/// # Example
///
/// ```
/// use qrsymbol::helper::generate_svg_string;
/// use qrsymbol::QrCodeEcc;
///
/// let svg_string = generate_svg_string("Hello, World!", QrCodeEcc::Low).unwrap();
/// assert!(svg_string.starts_with("<?xml"));
/// ```
pub fn generate_svg_string(content: &str, ecl: QrCodeEcc) -> QrResult<String> {
    let qr: QrCode = QrCode::encode_text(content, ecl)?;
    Ok(to_svg_string(&qr, DEFAULT_BORDER))
}

/// Generates a QR Code image buffer from the provided content, one pixel per module.
pub fn generate_image_buffer(content: &str, ecl: QrCodeEcc) -> QrResult<GrayImage> {
    let qr: QrCode = QrCode::encode_text(content, ecl)?;
    // At most 177 + 8 pixels wide
    let side = qr.size() as u32 + 2 * DEFAULT_BORDER;
    Ok(render_image(&qr, DEFAULT_BORDER, 1, side))
}
