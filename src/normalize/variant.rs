/// Threshold policy for binarizing variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    /// Pick the level from the image histogram (Otsu's method)
    Otsu,
    /// Use a fixed level
    Fixed(u8),
}

/// One immutable preprocessing recipe
///
/// The normalizer applies exactly the operations present here, in a fixed
/// order: grayscale conversion (always), contrast stretch, blur, sharpen,
/// threshold, resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessingVariant {
    /// Short identifier used in logs and diagnostics
    pub name: &'static str,
    /// Stretch the histogram to the full dynamic range
    pub contrast_stretch: bool,
    /// Gaussian blur sigma, for denoising
    pub blur_sigma: Option<f32>,
    /// Unsharp-mask amount
    pub sharpen: Option<f32>,
    /// Binarization policy
    pub threshold: Option<Threshold>,
    /// Scale the longest side to this many pixels
    pub resize_max: Option<u32>,
}

/// The fixed decode cascade, tried in order with first-hit exit.
///
/// As-is variants come first, corrective ones last. The length of this list
/// is the latency/accuracy knob: every entry costs a full transform plus a
/// full decode attempt on a miss.
pub const DEFAULT_CASCADE: &[PreprocessingVariant] = &[
    PreprocessingVariant {
        name: "as-is",
        contrast_stretch: false,
        blur_sigma: None,
        sharpen: None,
        threshold: None,
        resize_max: None,
    },
    PreprocessingVariant {
        name: "contrast",
        contrast_stretch: true,
        blur_sigma: None,
        sharpen: None,
        threshold: None,
        resize_max: None,
    },
    PreprocessingVariant {
        name: "rescale-640",
        contrast_stretch: false,
        blur_sigma: None,
        sharpen: None,
        threshold: None,
        resize_max: Some(640),
    },
    PreprocessingVariant {
        name: "sharpen",
        contrast_stretch: true,
        blur_sigma: None,
        sharpen: Some(1.5),
        threshold: None,
        resize_max: None,
    },
    PreprocessingVariant {
        name: "otsu-binary",
        contrast_stretch: true,
        blur_sigma: None,
        sharpen: None,
        threshold: Some(Threshold::Otsu),
        resize_max: None,
    },
    PreprocessingVariant {
        name: "denoise-binary",
        contrast_stretch: false,
        blur_sigma: Some(1.2),
        sharpen: None,
        threshold: Some(Threshold::Otsu),
        resize_max: None,
    },
    PreprocessingVariant {
        name: "hard-threshold",
        contrast_stretch: false,
        blur_sigma: None,
        sharpen: None,
        threshold: Some(Threshold::Fixed(128)),
        resize_max: None,
    },
    PreprocessingVariant {
        name: "rescale-1280",
        contrast_stretch: true,
        blur_sigma: None,
        sharpen: None,
        threshold: None,
        resize_max: Some(1280),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cascade_starts_untouched() {
        let first = &DEFAULT_CASCADE[0];
        assert!(!first.contrast_stretch);
        assert!(first.blur_sigma.is_none());
        assert!(first.sharpen.is_none());
        assert!(first.threshold.is_none());
        assert!(first.resize_max.is_none());
    }

    #[test]
    fn test_cascade_names_unique() {
        let mut names: Vec<_> = DEFAULT_CASCADE.iter().map(|v| v.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), DEFAULT_CASCADE.len());
    }

    #[test]
    fn test_cascade_is_bounded() {
        // The list is the latency knob; keep it a small fixed enumeration.
        assert!(DEFAULT_CASCADE.len() <= 10);
    }
}
