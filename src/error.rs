use thiserror::Error;

/// Top-level scan failures visible to callers
///
/// `NoCodeDetected` is an expected outcome, not a fault: the image was
/// well-formed but nothing recognizable was found by any strategy.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The uploaded bytes could not be decoded as an image
    #[error("could not read image data: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The decoded image has no pixels
    #[error("image has no pixels to scan")]
    EmptyImage,

    /// Every strategy (direct cascade, region rescan, structural
    /// classification) came up empty
    #[error("no machine-readable code detected")]
    NoCodeDetected,
}

/// Failures local to one preprocessing attempt
///
/// These never reach callers directly; the cascade logs them and moves on to
/// the next variant.
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// A resize collapsed the frame to nothing
    #[error("preprocessing produced a zero-area image ({width}x{height})")]
    ZeroArea {
        /// Computed output width
        width: u32,
        /// Computed output height
        height: u32,
    },

    /// Raw sample count disagrees with the reported dimensions
    #[error("pixel buffer holds {actual} samples but dimensions require {expected}")]
    BufferMismatch {
        /// Samples implied by width * height
        expected: usize,
        /// Samples actually present
        actual: usize,
    },
}
