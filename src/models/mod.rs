//! Core data structures (DecodedCode, Symbology, BitMatrix, Region)

/// Scan results and symbology names
pub mod decoded;
/// Compact binary raster
pub mod matrix;
/// Sub-frame partitioning for multi-code rescans
pub mod region;

pub use decoded::{DecodedCode, ScanReport, Symbology};
pub use matrix::BitMatrix;
pub use region::Region;
