//! Structural pattern classifier: the last-resort path when no decoder
//! produced a verified result
//!
//! Works purely from pixel statistics, so it can tell "this looks like a
//! dense matrix code" apart from "this looks like a bar pattern" but can
//! never recover payload bytes. Every result it emits says so: the value is
//! a descriptive placeholder, `metadata.note` names the inference, and
//! confidence stays strictly below 0.9. Swapping in a real decoder for one
//! of these families replaces this module without touching its callers.

/// Pixel-transition measurements
pub mod signal;

use image::DynamicImage;
use serde_json::json;

use crate::models::{DecodedCode, Symbology};
use signal::SignalStats;

/// Threshold ladder for binarization; the classification that scores the
/// highest confidence across the ladder wins, earliest level on ties.
pub const CLASSIFY_THRESHOLDS: &[u8] = &[96, 128, 160];

const MATRIX_MIN_DENSITY: f32 = 0.04;
const MATRIX_LOOSE_DENSITY: f32 = 0.07;
const MATRIX_STRICT_DENSITY: f32 = 0.12;
const MIN_BAR_TRANSITIONS: u32 = 24;
const DENSE_BAR_TRANSITIONS: u32 = 60;
const MIN_STACK_ROWS: u32 = 8;

#[derive(Debug, Clone, Copy)]
struct Classification {
    symbology: Symbology,
    confidence: f32,
}

/// Classify the likely symbology family of a frame no decoder could read.
///
/// Returns `None` when the signal matches no family; that is the expected
/// outcome for photos, text and blank frames.
pub fn classify(source: &DynamicImage) -> Option<DecodedCode> {
    let gray = source.to_luma8();
    if gray.width() == 0 || gray.height() == 0 {
        return None;
    }

    let mut best: Option<(SignalStats, Classification)> = None;
    for &level in CLASSIFY_THRESHOLDS {
        let stats = SignalStats::measure(&gray, level);
        if let Some(classification) = classify_stats(&stats) {
            let better = match &best {
                None => true,
                Some((_, current)) => classification.confidence > current.confidence,
            };
            if better {
                best = Some((stats, classification));
            }
        }
    }

    let (stats, classification) = best?;
    log::debug!(
        "structural classification: {} at {:.2} (threshold {})",
        classification.symbology,
        classification.confidence,
        stats.threshold
    );
    Some(build_result(&stats, classification))
}

/// The family rules, applied in priority order; the chain shape guarantees
/// at most one branch claims any input.
fn classify_stats(stats: &SignalStats) -> Option<Classification> {
    let ar = stats.aspect_ratio;
    let density = stats.transition_density();

    if (0.8..=1.2).contains(&ar)
        && (0.30..=0.70).contains(&stats.black_ratio)
        && density >= MATRIX_MIN_DENSITY
    {
        // Square-ish, balanced ink, busy in both directions: matrix family.
        let confidence = if density >= MATRIX_STRICT_DENSITY
            && (0.50..=0.65).contains(&stats.black_ratio)
        {
            0.85
        } else if density < MATRIX_LOOSE_DENSITY {
            0.55
        } else {
            0.70
        };
        Some(Classification {
            symbology: Symbology::Matrix2d,
            confidence,
        })
    } else if ar >= 2.0
        && stats.h_transitions >= MIN_BAR_TRANSITIONS
        && stats.h_transitions > 2 * stats.v_transitions
    {
        // Wide, horizontally busy, vertically quiet: parallel bars.
        if stats.h_transitions >= DENSE_BAR_TRANSITIONS {
            Some(Classification {
                symbology: Symbology::Code128,
                confidence: 0.75,
            })
        } else {
            Some(Classification {
                symbology: Symbology::LinearBarcode,
                confidence: 0.60,
            })
        }
    } else if (2.0..=6.0).contains(&ar)
        && stats.h_transitions >= MIN_BAR_TRANSITIONS
        && stats.v_transitions >= MIN_STACK_ROWS
    {
        // Wide but with real row structure: stacked rows of bars.
        Some(Classification {
            symbology: Symbology::Pdf417,
            confidence: 0.60,
        })
    } else {
        None
    }
}

fn build_result(stats: &SignalStats, classification: Classification) -> DecodedCode {
    let value = match classification.symbology {
        Symbology::Matrix2d => format!(
            "[unverified matrix code ~{}x{} px, transition density {:.2}]",
            stats.width,
            stats.height,
            stats.transition_density()
        ),
        Symbology::Pdf417 => format!(
            "[unverified stacked 2D code ~{}x{} px, {}h/{}v transitions]",
            stats.width, stats.height, stats.h_transitions, stats.v_transitions
        ),
        _ => format!(
            "[unverified linear barcode ~{}x{} px, {} bar transitions]",
            stats.width, stats.height, stats.h_transitions
        ),
    };

    DecodedCode::inferred(value, classification.symbology, classification.confidence)
        .with_meta(
            "note",
            json!("structural inference from pixel statistics; payload not decoded"),
        )
        .with_meta(
            "transitions",
            json!({
                "horizontal": stats.h_transitions,
                "vertical": stats.v_transitions,
            }),
        )
        .with_meta("black_ratio", json!(stats.black_ratio))
        .with_meta("threshold", json!(stats.threshold))
}
