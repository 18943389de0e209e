//! Synthetic image helpers shared by the binaries, benchmarks and tests
//!
//! Everything here is deterministic: fixtures are rendered or generated from
//! fixed inputs, never loaded from disk or randomized per run.

use std::io::Cursor;

use image::{GrayImage, ImageFormat, Luma};
use rxing::common::BitMatrix;
use rxing::{BarcodeFormat, MultiFormatWriter, Writer};

/// Render a QR code for `payload` at `module_px` pixels per module with a
/// white quiet border of `quiet_px` pixels on every side.
pub fn render_qr(
    payload: &str,
    module_px: u32,
    quiet_px: u32,
) -> Result<GrayImage, rxing::Exceptions> {
    let writer = MultiFormatWriter::default();
    let matrix = writer.encode(payload, &BarcodeFormat::QR_CODE, 0, 0)?;
    Ok(rasterize(&matrix, module_px, quiet_px))
}

/// Render a linear barcode for `payload` in the given format, stretched to
/// `bar_height_px` tall bars.
pub fn render_linear(
    payload: &str,
    format: BarcodeFormat,
    module_px: u32,
    bar_height_px: u32,
    quiet_px: u32,
) -> Result<GrayImage, rxing::Exceptions> {
    let writer = MultiFormatWriter::default();
    let matrix = writer.encode(payload, &format, 0, 0)?;
    Ok(rasterize_row(&matrix, module_px, bar_height_px, quiet_px))
}

/// Scale a module matrix to pixels with a quiet border
fn rasterize(matrix: &BitMatrix, module_px: u32, quiet_px: u32) -> GrayImage {
    let width = matrix.width() * module_px + 2 * quiet_px;
    let height = matrix.height() * module_px + 2 * quiet_px;
    GrayImage::from_fn(width, height, |x, y| {
        let inside = x >= quiet_px
            && y >= quiet_px
            && x < quiet_px + matrix.width() * module_px
            && y < quiet_px + matrix.height() * module_px;
        if inside && matrix.get((x - quiet_px) / module_px, (y - quiet_px) / module_px) {
            Luma([0])
        } else {
            Luma([255])
        }
    })
}

/// Scale a one-row module matrix into full-height bars
fn rasterize_row(matrix: &BitMatrix, module_px: u32, bar_height_px: u32, quiet_px: u32) -> GrayImage {
    let width = matrix.width() * module_px + 2 * quiet_px;
    let height = bar_height_px + 2 * quiet_px;
    GrayImage::from_fn(width, height, |x, y| {
        let inside = x >= quiet_px
            && y >= quiet_px
            && x < quiet_px + matrix.width() * module_px
            && y < quiet_px + bar_height_px;
        if inside && matrix.get((x - quiet_px) / module_px, 0) {
            Luma([0])
        } else {
            Luma([255])
        }
    })
}

/// A uniformly white frame
pub fn blank(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([255]))
}

/// Paste `image` onto a white canvas at (x, y)
pub fn place_on_canvas(image: &GrayImage, canvas_w: u32, canvas_h: u32, x: u32, y: u32) -> GrayImage {
    let mut canvas = blank(canvas_w, canvas_h);
    image::imageops::replace(&mut canvas, image, x as i64, y as i64);
    canvas
}

/// Put two frames side by side on a white canvas, separated by `gap` pixels
/// and vertically centered.
pub fn compose_horizontal(left: &GrayImage, right: &GrayImage, gap: u32) -> GrayImage {
    let width = left.width() + gap + right.width();
    let height = left.height().max(right.height());
    let mut canvas = blank(width, height);
    let left_y = (height - left.height()) / 2;
    let right_y = (height - right.height()) / 2;
    image::imageops::replace(&mut canvas, left, 0, left_y as i64);
    image::imageops::replace(
        &mut canvas,
        right,
        (left.width() + gap) as i64,
        right_y as i64,
    );
    canvas
}

/// Vertical bars of pseudo-random widths in [min_bar, max_bar], alternating
/// black and white; reproducible for a given seed.
pub fn synth_bar_pattern(
    width: u32,
    height: u32,
    min_bar: u32,
    max_bar: u32,
    seed: u64,
) -> GrayImage {
    let mut canvas = blank(width, height);
    let mut state = seed;
    let spread = max_bar.saturating_sub(min_bar) + 1;

    let mut x = 0u32;
    let mut black = true;
    while x < width {
        let span = min_bar + lcg_next(&mut state) % spread;
        if black {
            for bx in x..(x + span).min(width) {
                for by in 0..height {
                    canvas.put_pixel(bx, by, Luma([0]));
                }
            }
        }
        x += span;
        black = !black;
    }
    canvas
}

/// Encode a grayscale frame as PNG bytes, the shape scan requests arrive in
pub fn png_bytes(image: &GrayImage) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

fn lcg_next(state: &mut u64) -> u32 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    (*state >> 33) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_qr_has_quiet_border() {
        let img = render_qr("hello", 4, 16).unwrap();
        assert_eq!(img.get_pixel(0, 0).0[0], 255);
        assert_eq!(img.get_pixel(img.width() - 1, img.height() - 1).0[0], 255);
        assert!(img.pixels().any(|p| p.0[0] == 0), "no dark modules rendered");
    }

    #[test]
    fn test_bar_pattern_deterministic() {
        let a = synth_bar_pattern(200, 50, 2, 7, 99);
        let b = synth_bar_pattern(200, 50, 2, 7, 99);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_png_round_trip() {
        let img = blank(32, 16);
        let bytes = png_bytes(&img).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_luma8();
        assert_eq!(decoded.dimensions(), (32, 16));
        assert!(decoded.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn test_compose_widths_add_up() {
        let left = blank(40, 20);
        let right = blank(30, 26);
        let composed = compose_horizontal(&left, &right, 10);
        assert_eq!(composed.dimensions(), (80, 26));
    }
}
