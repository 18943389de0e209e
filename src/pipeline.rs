//! End-to-end scan orchestration: variant cascade, region rescan,
//! structural fallback, aggregation
//!
//! Everything here is sequential on purpose. The cascade exits on the first
//! hit, so iteration order determines which result wins when several
//! variants would succeed; running variants or regions concurrently would
//! change observable output.

use image::DynamicImage;
use serde_json::json;

use crate::aggregate::aggregate;
use crate::classify;
use crate::decode::DecoderAdapter;
use crate::error::ScanError;
use crate::models::{DecodedCode, region};
use crate::normalize::{self, variant::DEFAULT_CASCADE};

/// Run the whole pipeline over uploaded bytes and return the deduplicated,
/// priority-ordered result list. An empty list is a valid outcome here;
/// callers map it to the not-found error.
pub(crate) fn run(adapter: &DecoderAdapter, bytes: &[u8]) -> Result<Vec<DecodedCode>, ScanError> {
    let source = normalize::decode_image(bytes)?;

    let direct = try_all_variants(adapter, &source);
    let regions = scan_regions(adapter, &source);
    let heuristic = if direct.is_none() && regions.is_empty() {
        classify::classify(&source)
    } else {
        None
    };

    Ok(aggregate(direct, regions, heuristic))
}

/// Try every preprocessing variant in cascade order, returning the first
/// verified decode.
///
/// A variant whose normalization fails is logged and skipped; one bad recipe
/// must not abort the scan.
pub(crate) fn try_all_variants(
    adapter: &DecoderAdapter,
    source: &DynamicImage,
) -> Option<DecodedCode> {
    for variant in DEFAULT_CASCADE {
        let buffer = match normalize::normalize(source, variant) {
            Ok(buffer) => buffer,
            Err(err) => {
                log::debug!("variant {} skipped: {}", variant.name, err);
                continue;
            }
        };
        if let Some(code) = adapter.decode(&buffer) {
            log::debug!("variant {} produced a decode", variant.name);
            return Some(code);
        }
    }
    None
}

/// Re-run the full cascade over each fixed sub-region of the frame.
///
/// One decoder pass usually locates only the most prominent code; cropping
/// to halves and the center gives smaller or off-center codes their own
/// chance. Each hit records the region it came from. A region that finds
/// nothing never blocks the others.
pub(crate) fn scan_regions(adapter: &DecoderAdapter, source: &DynamicImage) -> Vec<DecodedCode> {
    let mut found = Vec::new();
    for region in region::partition(source.width(), source.height()) {
        let cropped = source.crop_imm(region.x, region.y, region.width, region.height);
        if let Some(code) = try_all_variants(adapter, &cropped) {
            found.push(code.with_meta(
                "region",
                json!({
                    "label": region.label,
                    "x": region.x,
                    "y": region.y,
                    "width": region.width,
                    "height": region.height,
                }),
            ));
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{blank, place_on_canvas, png_bytes, render_qr};

    #[test]
    fn test_cascade_decodes_clean_qr() {
        let qr = render_qr("cascade payload", 8, 32).unwrap();
        let source = DynamicImage::ImageLuma8(qr);
        let adapter = DecoderAdapter::new();

        let code = try_all_variants(&adapter, &source).expect("cascade should decode");
        assert_eq!(code.value, "cascade payload");
        assert_eq!(code.confidence, 1.0);
    }

    #[test]
    fn test_cascade_misses_blank() {
        let source = DynamicImage::ImageLuma8(blank(64, 64));
        let adapter = DecoderAdapter::new();
        assert!(try_all_variants(&adapter, &source).is_none());
    }

    #[test]
    fn test_regions_find_off_center_code() {
        // A code confined to the left half, on a canvas wide enough that
        // the left-half crop contains it whole.
        let qr = render_qr("left side", 6, 24).unwrap();
        let (qw, qh) = qr.dimensions();
        let canvas = place_on_canvas(&qr, qw * 2 + 64, qh + 32, 8, 16);
        let source = DynamicImage::ImageLuma8(canvas);
        let adapter = DecoderAdapter::new();

        let found = scan_regions(&adapter, &source);
        assert!(!found.is_empty());
        let left = found.iter().find(|c| c.value == "left side").unwrap();
        let region = &left.metadata["region"];
        assert!(region["label"].is_string());
        assert!(region["width"].as_u64().unwrap() > 0);
    }

    #[test]
    fn test_run_surfaces_malformed_input() {
        let adapter = DecoderAdapter::new();
        let err = run(&adapter, b"not an image").unwrap_err();
        assert!(matches!(err, ScanError::ImageDecode(_)));
    }

    #[test]
    fn test_run_empty_for_blank_frame() {
        let adapter = DecoderAdapter::new();
        let bytes = png_bytes(&blank(128, 128)).unwrap();
        let results = run(&adapter, &bytes).unwrap();
        assert!(results.is_empty());
    }
}
