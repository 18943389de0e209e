//! codescan - multi-strategy barcode and QR code recognition
//!
//! Given arbitrary uploaded image bytes, decide whether they contain one or
//! more machine-readable codes, decode the content where a decoder can, and
//! fall back to a confidence-capped structural classification where none
//! can. The pipeline runs a fixed cascade of preprocessing variants against
//! two real decoders, rescans fixed sub-regions to pick up secondary codes,
//! and merges everything into one deduplicated, priority-ordered response.
//!
//! All processing is per-request and deterministic: byte-identical input
//! yields byte-identical output.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Structural pattern classification from pixel statistics
pub mod classify;
/// Verified decoding through the wrapped barcode libraries
pub mod decode;
/// Error taxonomy
pub mod error;
/// Core data structures (DecodedCode, Symbology, BitMatrix, Region)
pub mod models;
/// Image decoding and the preprocessing variant cascade
pub mod normalize;
/// Synthetic fixtures for binaries, benchmarks and tests
pub mod tools;

mod aggregate;
mod pipeline;

pub use decode::DecoderAdapter;
pub use error::ScanError;
pub use models::{DecodedCode, ScanReport, Symbology};

/// Scan service handle
///
/// Holds the decoder adapter and nothing else. Configuration (the symbology
/// allow-list) is fixed at construction, so one `Scanner` can be built at
/// process start and shared across requests without any per-request mutable
/// state.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    adapter: DecoderAdapter,
}

impl Scanner {
    /// Create a scanner with the default symbology allow-list
    pub fn new() -> Self {
        Self {
            adapter: DecoderAdapter::new(),
        }
    }

    /// Create a scanner around a specific adapter, for custom allow-lists
    /// or test doubles
    pub fn with_adapter(adapter: DecoderAdapter) -> Self {
        Self { adapter }
    }

    /// Scan uploaded image bytes and return the single best code.
    ///
    /// Errors with [`ScanError::NoCodeDetected`] when nothing recognizable
    /// was found; that is the expected negative outcome, distinct from
    /// malformed input.
    pub fn scan(&self, bytes: &[u8]) -> Result<DecodedCode, ScanError> {
        let mut results = pipeline::run(&self.adapter, bytes)?;
        if results.is_empty() {
            return Err(ScanError::NoCodeDetected);
        }
        Ok(results.remove(0))
    }

    /// Scan uploaded image bytes and return every distinct code found.
    ///
    /// Entries are ordered by priority (whole-frame decode first, then
    /// region decodes, then any structural classification) and never share a
    /// value. Errors with [`ScanError::NoCodeDetected`] when empty.
    pub fn scan_all(&self, bytes: &[u8]) -> Result<ScanReport, ScanError> {
        let results = pipeline::run(&self.adapter, bytes)?;
        if results.is_empty() {
            return Err(ScanError::NoCodeDetected);
        }
        Ok(ScanReport {
            count: results.len(),
            results,
        })
    }
}

/// Scan with a default-configured [`Scanner`]; see [`Scanner::scan`]
pub fn scan(bytes: &[u8]) -> Result<DecodedCode, ScanError> {
    Scanner::new().scan(bytes)
}

/// Scan with a default-configured [`Scanner`]; see [`Scanner::scan_all`]
pub fn scan_all(bytes: &[u8]) -> Result<ScanReport, ScanError> {
    Scanner::new().scan_all(bytes)
}
