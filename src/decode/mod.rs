//! Direct decoder adapter: the verified-decode path
//!
//! Wraps two third-party decoders behind one call: `rqrr` for dense matrix
//! grids, then `rxing`'s multi-format reader over a fixed symbology
//! allow-list. Anything returned from here carries confidence 1.0 and the
//! payload exactly as decoded.

use std::collections::HashSet;

use image::GrayImage;
use rxing::common::HybridBinarizer;
use rxing::{
    BarcodeFormat, BinaryBitmap, DecodeHintValue, DecodeHints, Luma8LuminanceSource,
    MultiFormatReader, Reader,
};
use serde_json::json;

use crate::models::{DecodedCode, Symbology};

/// Symbologies requested from the multi-format reader when none are
/// specified explicitly
pub const DEFAULT_FORMATS: &[BarcodeFormat] = &[
    BarcodeFormat::QR_CODE,
    BarcodeFormat::MICRO_QR_CODE,
    BarcodeFormat::DATA_MATRIX,
    BarcodeFormat::PDF_417,
    BarcodeFormat::CODE_128,
    BarcodeFormat::CODE_39,
    BarcodeFormat::ITF,
    BarcodeFormat::EAN_13,
    BarcodeFormat::EAN_8,
    BarcodeFormat::UPC_A,
    BarcodeFormat::UPC_E,
];

/// Adapter over the underlying barcode decoders
///
/// The allow-list is fixed at construction and never mutated afterwards, so
/// a single adapter can safely back any number of requests.
#[derive(Debug, Clone)]
pub struct DecoderAdapter {
    formats: Vec<BarcodeFormat>,
}

impl DecoderAdapter {
    /// Create an adapter with the default symbology allow-list
    pub fn new() -> Self {
        Self::with_formats(DEFAULT_FORMATS.to_vec())
    }

    /// Create an adapter restricted to the given symbologies
    pub fn with_formats(formats: Vec<BarcodeFormat>) -> Self {
        Self { formats }
    }

    /// Attempt a verified decode of one normalized buffer.
    ///
    /// Returns `None` both for "nothing there" and for decoder invocation
    /// failures; neither is a caller-visible fault at this level. Failures
    /// are logged with the buffer shape for diagnosis.
    pub fn decode(&self, buffer: &GrayImage) -> Option<DecodedCode> {
        if let Some(code) = self.decode_dense_matrix(buffer) {
            return Some(code);
        }
        self.decode_multi_format(buffer)
    }

    /// Dense-matrix path: rqrr grid detection, first grid that decodes wins
    fn decode_dense_matrix(&self, buffer: &GrayImage) -> Option<DecodedCode> {
        let mut prepared = rqrr::PreparedImage::prepare(buffer.clone());
        for grid in prepared.detect_grids() {
            match grid.decode() {
                Ok((meta, content)) => {
                    if content.is_empty() {
                        log::debug!("grid decoded to an empty payload, skipping");
                        continue;
                    }
                    return Some(
                        DecodedCode::verified(content, Symbology::QrCode)
                            .with_meta("version", json!(meta.version.0))
                            .with_meta("ecc_level", json!(meta.ecc_level))
                            .with_meta("mask", json!(meta.mask)),
                    );
                }
                Err(err) => {
                    log::debug!(
                        "grid located in {}x{} buffer but failed to decode: {:?}",
                        buffer.width(),
                        buffer.height(),
                        err
                    );
                }
            }
        }
        None
    }

    /// Multi-format path: rxing with the configured allow-list
    fn decode_multi_format(&self, buffer: &GrayImage) -> Option<DecodedCode> {
        let (width, height) = buffer.dimensions();
        let source = Luma8LuminanceSource::new(buffer.as_raw().clone(), width, height);
        let mut bitmap = BinaryBitmap::new(HybridBinarizer::new(source));
        let hints = self.hints();

        let mut reader = MultiFormatReader::default();
        match reader.decode_with_hints(&mut bitmap, &hints) {
            Ok(result) => {
                let value = result.getText().to_string();
                if value.is_empty() {
                    log::debug!("multi-format reader returned an empty payload, dropping");
                    return None;
                }
                let symbology = symbology_for_format(result.getBarcodeFormat());
                Some(DecodedCode::verified(value, symbology))
            }
            Err(err) => {
                log::debug!(
                    "multi-format decode found nothing in {}x{} single-channel buffer: {}",
                    width,
                    height,
                    err
                );
                None
            }
        }
    }

    fn hints(&self) -> DecodeHints {
        let formats: HashSet<BarcodeFormat> = self.formats.iter().copied().collect();
        DecodeHints::default()
            .with(DecodeHintValue::TryHarder(true))
            .with(DecodeHintValue::PossibleFormats(formats))
            .with(DecodeHintValue::AlsoInverted(true))
    }
}

impl Default for DecoderAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn symbology_for_format(format: &BarcodeFormat) -> Symbology {
    match format {
        BarcodeFormat::QR_CODE => Symbology::QrCode,
        BarcodeFormat::MICRO_QR_CODE => Symbology::MicroQrCode,
        BarcodeFormat::DATA_MATRIX => Symbology::DataMatrix,
        BarcodeFormat::PDF_417 => Symbology::Pdf417,
        BarcodeFormat::CODE_128 => Symbology::Code128,
        BarcodeFormat::CODE_39 => Symbology::Code39,
        BarcodeFormat::ITF => Symbology::Itf,
        BarcodeFormat::EAN_13 => Symbology::Ean13,
        BarcodeFormat::EAN_8 => Symbology::Ean8,
        BarcodeFormat::UPC_A => Symbology::UpcA,
        BarcodeFormat::UPC_E => Symbology::UpcE,
        _ => Symbology::Unknown,
    }
}
