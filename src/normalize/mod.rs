//! Raster normalization: turning arbitrary uploaded image bytes into
//! decoder-ready grayscale buffers under one preprocessing recipe
//!
//! `normalize` is a pure function of (image, variant). It validates its
//! output before handoff: the downstream luminance sources trust the caller's
//! dimensions, so a buffer whose sample count disagrees with its reported
//! size must be rejected here rather than silently truncated later.

/// Preprocessing recipes and the default cascade order
pub mod variant;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage};
use imageproc::filter::{gaussian_blur_f32, sharpen_gaussian};

use crate::error::{NormalizeError, ScanError};
use variant::{PreprocessingVariant, Threshold};

/// Decode uploaded bytes into an image, surfacing malformed data immediately.
///
/// Animated sources contribute only their first frame, which is what the
/// static decode path of the `image` crate yields.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ScanError> {
    let image = image::load_from_memory(bytes)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(ScanError::EmptyImage);
    }
    Ok(image)
}

/// Produce one grayscale buffer from the source under the given recipe.
///
/// Operations run in a fixed order and only when present in the variant:
/// grayscale, contrast stretch, blur, sharpen, threshold, resize.
pub fn normalize(
    source: &DynamicImage,
    variant: &PreprocessingVariant,
) -> Result<GrayImage, NormalizeError> {
    let mut buffer = source.to_luma8();

    if variant.contrast_stretch {
        buffer = stretch_contrast(&buffer);
    }
    if let Some(sigma) = variant.blur_sigma {
        buffer = gaussian_blur_f32(&buffer, sigma);
    }
    if let Some(amount) = variant.sharpen {
        buffer = sharpen_gaussian(&buffer, 1.0, amount);
    }
    if let Some(threshold) = variant.threshold {
        let level = match threshold {
            Threshold::Otsu => otsu_level(&buffer),
            Threshold::Fixed(level) => level,
        };
        buffer = apply_threshold(&buffer, level);
    }
    if let Some(target) = variant.resize_max {
        buffer = resize_to_max(&buffer, target)?;
    }

    ensure_consistent(&buffer)?;
    Ok(buffer)
}

/// Stretch the histogram so the darkest pixel maps to 0 and the brightest
/// to 255. Flat images pass through unchanged.
pub fn stretch_contrast(buffer: &GrayImage) -> GrayImage {
    let mut lo = u8::MAX;
    let mut hi = u8::MIN;
    for pixel in buffer.pixels() {
        let v = pixel.0[0];
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if hi <= lo {
        return buffer.clone();
    }

    let range = (hi - lo) as u16;
    let (width, height) = buffer.dimensions();
    let mut out = GrayImage::new(width, height);
    for (src, dst) in buffer.pixels().zip(out.pixels_mut()) {
        let v = (src.0[0] - lo) as u16;
        dst.0[0] = (v * 255 / range) as u8;
    }
    out
}

/// Binarize to pure black (0) and white (255) at the given level
pub fn apply_threshold(buffer: &GrayImage, level: u8) -> GrayImage {
    let (width, height) = buffer.dimensions();
    let mut out = GrayImage::new(width, height);
    for (src, dst) in buffer.pixels().zip(out.pixels_mut()) {
        dst.0[0] = if src.0[0] < level { 0 } else { 255 };
    }
    out
}

/// Calculate the optimal global threshold by Otsu's method
pub fn otsu_level(buffer: &GrayImage) -> u8 {
    // Build histogram
    let mut histogram = [0u32; 256];
    for pixel in buffer.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total_pixels = buffer.len() as f64;
    let mut max_variance = 0.0;
    let mut optimal_threshold = 128u8;

    for threshold in 0..=255u8 {
        let mut class1_pixels = 0u32;
        let mut class1_sum = 0u64;
        let mut class2_pixels = 0u32;
        let mut class2_sum = 0u64;

        for intensity in 0..=255u8 {
            let count = histogram[intensity as usize];
            if intensity < threshold {
                class1_pixels += count;
                class1_sum += count as u64 * intensity as u64;
            } else {
                class2_pixels += count;
                class2_sum += count as u64 * intensity as u64;
            }
        }

        if class1_pixels == 0 || class2_pixels == 0 {
            continue;
        }

        let class1_mean = class1_sum as f64 / class1_pixels as f64;
        let class2_mean = class2_sum as f64 / class2_pixels as f64;

        let weight1 = class1_pixels as f64 / total_pixels;
        let weight2 = class2_pixels as f64 / total_pixels;

        let variance = weight1 * weight2 * (class1_mean - class2_mean).powi(2);

        if variance > max_variance {
            max_variance = variance;
            optimal_threshold = threshold;
        }
    }

    optimal_threshold
}

/// Scale the longest side to `target` pixels, preserving aspect ratio.
/// Extreme aspect ratios can round the short side to zero; that is an error,
/// not a silently empty image.
fn resize_to_max(buffer: &GrayImage, target: u32) -> Result<GrayImage, NormalizeError> {
    let (width, height) = buffer.dimensions();
    let max_side = width.max(height);
    if max_side == target {
        return Ok(buffer.clone());
    }

    let scale = target as f32 / max_side as f32;
    let new_width = (width as f32 * scale).round() as u32;
    let new_height = (height as f32 * scale).round() as u32;
    if new_width == 0 || new_height == 0 {
        return Err(NormalizeError::ZeroArea {
            width: new_width,
            height: new_height,
        });
    }

    Ok(image::imageops::resize(
        buffer,
        new_width,
        new_height,
        FilterType::Triangle,
    ))
}

/// Verify the raw sample count matches the reported single-channel dimensions
fn ensure_consistent(buffer: &GrayImage) -> Result<(), NormalizeError> {
    let expected = buffer.width() as usize * buffer.height() as usize;
    let actual = buffer.as_raw().len();
    if expected != actual {
        return Err(NormalizeError::BufferMismatch { expected, actual });
    }
    if expected == 0 {
        return Err(NormalizeError::ZeroArea {
            width: buffer.width(),
            height: buffer.height(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use variant::DEFAULT_CASCADE;

    fn gradient(width: u32, height: u32, lo: u8, hi: u8) -> DynamicImage {
        let img = GrayImage::from_fn(width, height, |x, _| {
            let t = x as f32 / (width - 1).max(1) as f32;
            Luma([(lo as f32 + t * (hi - lo) as f32) as u8])
        });
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn test_stretch_contrast_full_range() {
        let img = gradient(64, 8, 60, 180).to_luma8();
        let stretched = stretch_contrast(&img);
        let min = stretched.pixels().map(|p| p.0[0]).min().unwrap();
        let max = stretched.pixels().map(|p| p.0[0]).max().unwrap();
        assert_eq!(min, 0);
        assert_eq!(max, 255);
    }

    #[test]
    fn test_stretch_contrast_flat_image() {
        let img = GrayImage::from_pixel(10, 10, Luma([128]));
        let stretched = stretch_contrast(&img);
        assert!(stretched.pixels().all(|p| p.0[0] == 128));
    }

    #[test]
    fn test_apply_threshold_binary_output() {
        let img = gradient(32, 4, 0, 255).to_luma8();
        let binary = apply_threshold(&img, 128);
        assert!(binary.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert_eq!(binary.get_pixel(0, 0).0[0], 0);
        assert_eq!(binary.get_pixel(31, 0).0[0], 255);
    }

    #[test]
    fn test_otsu_separates_bimodal() {
        // Two well-separated classes; the level must land between them
        let mut img = GrayImage::new(10, 10);
        for (i, pixel) in img.pixels_mut().enumerate() {
            pixel.0[0] = if i < 50 { 50 } else { 200 };
        }
        let level = otsu_level(&img);
        assert!(level > 50 && level <= 200, "got level {}", level);
    }

    #[test]
    fn test_resize_to_max_scales_longest_side() {
        let img = GrayImage::new(200, 100);
        let resized = resize_to_max(&img, 50).unwrap();
        assert_eq!(resized.dimensions(), (50, 25));
    }

    #[test]
    fn test_resize_zero_area_rejected() {
        // 1000x1 scaled to 4 rounds the height to zero
        let img = GrayImage::new(1000, 1);
        let err = resize_to_max(&img, 4).unwrap_err();
        assert!(matches!(err, NormalizeError::ZeroArea { .. }));
    }

    #[test]
    fn test_normalize_applies_threshold_variant() {
        let source = gradient(64, 64, 20, 230);
        let variant = DEFAULT_CASCADE
            .iter()
            .find(|v| v.name == "otsu-binary")
            .unwrap();
        let buffer = normalize(&source, variant).unwrap();
        assert!(buffer.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let source = gradient(48, 48, 0, 255);
        for variant in DEFAULT_CASCADE {
            let a = normalize(&source, variant).unwrap();
            let b = normalize(&source, variant).unwrap();
            assert_eq!(a.as_raw(), b.as_raw(), "variant {}", variant.name);
        }
    }

    #[test]
    fn test_decode_image_rejects_garbage() {
        assert!(decode_image(&[0x00, 0x01, 0x02, 0x03]).is_err());
    }
}
