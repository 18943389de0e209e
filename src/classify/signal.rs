//! Pixel-signal statistics backing the structural classifier

use image::GrayImage;

use crate::models::BitMatrix;

/// Scanlines are sampled at these fractions of the frame, a band around the
/// middle, so edge noise and quiet zones contribute less.
const SAMPLE_FRACTIONS: &[f32] = &[0.40, 0.45, 0.50, 0.55, 0.60];

/// Measurements taken from one binarized view of a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalStats {
    /// Threshold level the frame was binarized at
    pub threshold: u8,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Fraction of black pixels in [0, 1]
    pub black_ratio: f32,
    /// Black/white flips per sampled row, averaged over the middle band
    pub h_transitions: u32,
    /// Black/white flips per sampled column, averaged over the middle band
    pub v_transitions: u32,
    /// Width divided by height
    pub aspect_ratio: f32,
}

impl SignalStats {
    /// Binarize the frame at `threshold` and measure it
    pub fn measure(gray: &GrayImage, threshold: u8) -> Self {
        let (width, height) = gray.dimensions();
        let binary = binarize(gray, threshold);

        let total = (width as usize * height as usize).max(1);
        let black_ratio = binary.count_set() as f32 / total as f32;

        let h_transitions = average_row_transitions(&binary);
        let v_transitions = average_column_transitions(&binary);
        let aspect_ratio = width as f32 / height.max(1) as f32;

        Self {
            threshold,
            width,
            height,
            black_ratio,
            h_transitions,
            v_transitions,
            aspect_ratio,
        }
    }

    /// Transitions normalized by frame size, averaged over both axes.
    /// Dense matrix codes sit well above sparse text or photos here.
    pub fn transition_density(&self) -> f32 {
        let h_rate = self.h_transitions as f32 / self.width.max(1) as f32;
        let v_rate = self.v_transitions as f32 / self.height.max(1) as f32;
        (h_rate + v_rate) / 2.0
    }
}

fn binarize(gray: &GrayImage, threshold: u8) -> BitMatrix {
    let (width, height) = gray.dimensions();
    let mut binary = BitMatrix::new(width as usize, height as usize);
    for (x, y, pixel) in gray.enumerate_pixels() {
        if pixel.0[0] < threshold {
            binary.set(x as usize, y as usize, true);
        }
    }
    binary
}

fn average_row_transitions(binary: &BitMatrix) -> u32 {
    let height = binary.height();
    if height == 0 || binary.width() < 2 {
        return 0;
    }

    let mut total = 0usize;
    for &fraction in SAMPLE_FRACTIONS {
        let y = ((height as f32 * fraction) as usize).min(height - 1);
        let mut previous = binary.get(0, y);
        for x in 1..binary.width() {
            let current = binary.get(x, y);
            if current != previous {
                total += 1;
                previous = current;
            }
        }
    }
    (total / SAMPLE_FRACTIONS.len()) as u32
}

fn average_column_transitions(binary: &BitMatrix) -> u32 {
    let width = binary.width();
    if width == 0 || binary.height() < 2 {
        return 0;
    }

    let mut total = 0usize;
    for &fraction in SAMPLE_FRACTIONS {
        let x = ((width as f32 * fraction) as usize).min(width - 1);
        let mut previous = binary.get(x, 0);
        for y in 1..binary.height() {
            let current = binary.get(x, y);
            if current != previous {
                total += 1;
                previous = current;
            }
        }
    }
    (total / SAMPLE_FRACTIONS.len()) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_blank_frame_has_no_signal() {
        let img = GrayImage::from_pixel(100, 100, Luma([255]));
        let stats = SignalStats::measure(&img, 128);
        assert_eq!(stats.black_ratio, 0.0);
        assert_eq!(stats.h_transitions, 0);
        assert_eq!(stats.v_transitions, 0);
        assert_eq!(stats.aspect_ratio, 1.0);
    }

    #[test]
    fn test_vertical_bars_transition_horizontally() {
        // 10px-wide alternating bars: flips along rows, none along columns
        let img = GrayImage::from_fn(200, 50, |x, _| {
            if (x / 10) % 2 == 0 { Luma([0]) } else { Luma([255]) }
        });
        let stats = SignalStats::measure(&img, 128);
        assert_eq!(stats.h_transitions, 19);
        assert_eq!(stats.v_transitions, 0);
        assert!((stats.black_ratio - 0.5).abs() < 0.05);
        assert_eq!(stats.aspect_ratio, 4.0);
    }

    #[test]
    fn test_checkerboard_transitions_both_ways() {
        let img = GrayImage::from_fn(80, 80, |x, y| {
            if ((x / 8) + (y / 8)) % 2 == 0 { Luma([0]) } else { Luma([255]) }
        });
        let stats = SignalStats::measure(&img, 128);
        assert_eq!(stats.h_transitions, 9);
        assert_eq!(stats.v_transitions, 9);
        assert!(stats.transition_density() > 0.1);
    }

    #[test]
    fn test_measure_is_deterministic() {
        let img = GrayImage::from_fn(120, 60, |x, y| Luma([((x * 7 + y * 13) % 256) as u8]));
        let a = SignalStats::measure(&img, 100);
        let b = SignalStats::measure(&img, 100);
        assert_eq!(a, b);
    }
}
