use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Barcode symbology, serialized under its canonical wire name
///
/// Verified decodes carry the concrete format reported by the decoder.
/// The structural classifier uses the family variants (`Matrix2d`,
/// `LinearBarcode`) when the signal cannot pin down a single format, or a
/// "probable" concrete format (`Pdf417`, `Code128`) where the statistics
/// justify one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbology {
    /// QR Code (ISO/IEC 18004)
    #[serde(rename = "QR_CODE")]
    QrCode,
    /// Micro QR Code
    #[serde(rename = "MICRO_QR_CODE")]
    MicroQrCode,
    /// Data Matrix (ISO/IEC 16022)
    #[serde(rename = "DATA_MATRIX")]
    DataMatrix,
    /// PDF417 stacked 2D format
    #[serde(rename = "PDF417")]
    Pdf417,
    /// Code 128 linear format
    #[serde(rename = "CODE_128")]
    Code128,
    /// Code 39 linear format
    #[serde(rename = "CODE_39")]
    Code39,
    /// EAN-13 retail format
    #[serde(rename = "EAN_13")]
    Ean13,
    /// EAN-8 short retail format
    #[serde(rename = "EAN_8")]
    Ean8,
    /// UPC-A retail format
    #[serde(rename = "UPC_A")]
    UpcA,
    /// UPC-E compressed retail format
    #[serde(rename = "UPC_E")]
    UpcE,
    /// Interleaved 2 of 5 linear format
    #[serde(rename = "ITF")]
    Itf,
    /// Unspecified dense square 2D code (structural classification only)
    #[serde(rename = "MATRIX_2D")]
    Matrix2d,
    /// Unspecified 1D bar pattern (structural classification only)
    #[serde(rename = "LINEAR_BARCODE")]
    LinearBarcode,
    /// Format reported by a decoder but outside the known set
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Symbology {
    /// Canonical wire name, identical to the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            Symbology::QrCode => "QR_CODE",
            Symbology::MicroQrCode => "MICRO_QR_CODE",
            Symbology::DataMatrix => "DATA_MATRIX",
            Symbology::Pdf417 => "PDF417",
            Symbology::Code128 => "CODE_128",
            Symbology::Code39 => "CODE_39",
            Symbology::Ean13 => "EAN_13",
            Symbology::Ean8 => "EAN_8",
            Symbology::UpcA => "UPC_A",
            Symbology::UpcE => "UPC_E",
            Symbology::Itf => "ITF",
            Symbology::Matrix2d => "MATRIX_2D",
            Symbology::LinearBarcode => "LINEAR_BARCODE",
            Symbology::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recognized code, the unit of every scan response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedCode {
    /// Decoded payload, or a descriptive placeholder for structural
    /// classifications; never empty
    pub value: String,
    /// Recognized or inferred symbology
    pub symbology: Symbology,
    /// Score in [0, 1]; exactly 1.0 only for verified decoder output,
    /// always below 0.9 for structural classifications
    pub confidence: f32,
    /// Optional extras: matrix version/ECC info, originating region,
    /// transition statistics, provenance note
    #[serde(skip_serializing_if = "Map::is_empty", default)]
    pub metadata: Map<String, Value>,
}

impl DecodedCode {
    /// A result backed by an actual library decode; payload is verbatim.
    pub(crate) fn verified(value: String, symbology: Symbology) -> Self {
        debug_assert!(!value.is_empty());
        Self {
            value,
            symbology,
            confidence: 1.0,
            metadata: Map::new(),
        }
    }

    /// A best-effort structural classification; confidence stays under 0.9.
    pub(crate) fn inferred(value: String, symbology: Symbology, confidence: f32) -> Self {
        debug_assert!(!value.is_empty());
        debug_assert!(confidence > 0.0 && confidence < 0.9);
        Self {
            value,
            symbology,
            confidence,
            metadata: Map::new(),
        }
    }

    pub(crate) fn with_meta(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    /// True when this entry came from a real decoder rather than the
    /// structural fallback
    pub fn is_verified(&self) -> bool {
        self.confidence == 1.0
    }
}

/// Response body for a multi-code scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Every distinct code found, highest priority first
    pub results: Vec<DecodedCode>,
    /// Number of entries in `results`
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbology_wire_names() {
        assert_eq!(Symbology::QrCode.as_str(), "QR_CODE");
        assert_eq!(Symbology::Pdf417.as_str(), "PDF417");
        assert_eq!(Symbology::LinearBarcode.as_str(), "LINEAR_BARCODE");

        let json = serde_json::to_string(&Symbology::DataMatrix).unwrap();
        assert_eq!(json, "\"DATA_MATRIX\"");
    }

    #[test]
    fn test_verified_confidence() {
        let code = DecodedCode::verified("hello".into(), Symbology::QrCode);
        assert!(code.is_verified());
        assert_eq!(code.confidence, 1.0);
        assert!(code.metadata.is_empty());
    }

    #[test]
    fn test_inferred_stays_below_ceiling() {
        let code = DecodedCode::inferred("[pattern]".into(), Symbology::Matrix2d, 0.85);
        assert!(!code.is_verified());
        assert!(code.confidence < 0.9);
    }

    #[test]
    fn test_metadata_serialization() {
        let code = DecodedCode::verified("x".into(), Symbology::Ean13)
            .with_meta("version", serde_json::json!(4));
        let json = serde_json::to_value(&code).unwrap();
        assert_eq!(json["symbology"], "EAN_13");
        assert_eq!(json["metadata"]["version"], 4);

        // Empty metadata is omitted from the wire shape
        let bare = DecodedCode::verified("y".into(), Symbology::QrCode);
        let json = serde_json::to_value(&bare).unwrap();
        assert!(json.get("metadata").is_none());
    }
}
