// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR through the Tesseract command-line engine.
//
// The binarized page is written to a scratch PNG and recognized with
// `tesseract <image> stdout -l <lang> --psm <mode>`. Spanish (`spa`) with
// page segmentation mode 6 (a single uniform block of text) is the default
// for complaint letters.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use faro_core::config::OcrSettings;
use faro_core::error::Result;
use image::{DynamicImage, GrayImage};
use tracing::{debug, instrument, warn};

use crate::image::processor::encode_png;
use crate::tool::run_with_deadline;

/// Recognizes the text on one normalized page.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, page: &GrayImage) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    executable: PathBuf,
    language: String,
    page_segmentation_mode: u8,
    timeout: Duration,
}

impl TesseractRecognizer {
    pub fn new(executable: impl Into<PathBuf>, settings: &OcrSettings) -> Self {
        Self {
            executable: executable.into(),
            language: settings.language.clone(),
            page_segmentation_mode: settings.page_segmentation_mode,
            timeout: Duration::from_secs(settings.page_timeout_secs),
        }
    }

    /// Arguments following the image path.
    fn arguments(&self) -> Vec<String> {
        vec![
            "stdout".into(),
            "-l".into(),
            self.language.clone(),
            "--psm".into(),
            self.page_segmentation_mode.to_string(),
        ]
    }

    fn command(&self, image: &std::path::Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg(image).args(self.arguments());
        cmd
    }
}

impl TextRecognizer for TesseractRecognizer {
    #[instrument(skip(self, page), fields(width = page.width(), height = page.height()))]
    fn recognize(&self, page: &GrayImage) -> Result<String> {
        let png = encode_png(&DynamicImage::ImageLuma8(page.clone()))?;
        let scratch = tempfile::Builder::new()
            .prefix("faro-ocr-")
            .suffix(".png")
            .tempfile()?;
        std::fs::write(scratch.path(), &png)?;

        let output = run_with_deadline(self.command(scratch.path()), "tesseract", self.timeout)?;
        let text = decode_ocr_output(output.stdout);
        debug!(chars = text.chars().count(), "Page recognized");
        Ok(text)
    }
}

/// Tesseract emits UTF-8; anything else is decoded best-effort with
/// replacement characters rather than failing the document.
fn decode_ocr_output(stdout: Vec<u8>) -> String {
    match String::from_utf8(stdout) {
        Ok(text) => text,
        Err(err) => {
            warn!(
                valid_up_to = err.utf8_error().valid_up_to(),
                "OCR output is not valid UTF-8, decoding lossily"
            );
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faro_core::FaroError;

    #[test]
    fn defaults_use_spanish_block_mode() {
        let recognizer = TesseractRecognizer::new("tesseract", &OcrSettings::default());
        assert_eq!(recognizer.arguments(), ["stdout", "-l", "spa", "--psm", "6"]);
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let text = decode_ocr_output(vec![b'h', b'o', 0xFF, b'l', b'a']);
        assert_eq!(text, "ho\u{FFFD}la");
    }

    #[test]
    fn valid_utf8_passes_through() {
        assert_eq!(decode_ocr_output("Señor".as_bytes().to_vec()), "Señor");
    }

    #[test]
    fn missing_engine_is_extraction_error() {
        let recognizer = TesseractRecognizer::new("/nonexistent/tesseract", &OcrSettings::default());
        let err = recognizer.recognize(&GrayImage::new(4, 4)).unwrap_err();
        assert!(matches!(err, FaroError::Extraction(_)));
    }
}
