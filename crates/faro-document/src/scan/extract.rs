// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page OCR extractor: render, normalize, recognize, and fold every page of a
// source document into one text with page markers.

use std::path::Path;

use faro_core::error::{FaroError, Result};
use faro_core::text::strip_accents;
use tracing::{debug, info, instrument};

use crate::image::processor::normalize_page;
use crate::scan::ocr::TextRecognizer;
use crate::scan::render::PageRenderer;

/// Produces the full text of a source document.
pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, document: &Path) -> Result<String>;
}

/// Separator placed before each page's text.
pub fn page_marker(page: usize) -> String {
    format!("\n\n--- Página {page} ---\n\n")
}

/// OCR-based extractor. Pages are processed strictly in physical order and a
/// failure on any page fails the whole document.
pub struct PageOcrExtractor {
    renderer: Box<dyn PageRenderer>,
    recognizer: Box<dyn TextRecognizer>,
    dpi: u32,
}

impl PageOcrExtractor {
    pub fn new(
        renderer: Box<dyn PageRenderer>,
        recognizer: Box<dyn TextRecognizer>,
        dpi: u32,
    ) -> Self {
        Self {
            renderer,
            recognizer,
            dpi,
        }
    }

    fn page_text(&self, document: &Path, page: usize) -> Result<String> {
        let encoded = self.renderer.render_page(document, page, self.dpi)?;
        let binary = normalize_page(&encoded)?;
        let raw = self.recognizer.recognize(&binary)?;
        Ok(strip_accents(raw.trim()))
    }
}

impl DocumentExtractor for PageOcrExtractor {
    #[instrument(skip(self), fields(document = %document.display(), dpi = self.dpi))]
    fn extract(&self, document: &Path) -> Result<String> {
        let pages = self.renderer.page_count(document)?;
        if pages == 0 {
            return Err(FaroError::Extraction(format!(
                "{} has no pages",
                document.display()
            )));
        }
        info!(pages, "Extracting text");

        let mut text = String::new();
        for page in 1..=pages {
            let page_text = self
                .page_text(document, page)
                .map_err(|err| at_page(page, err))?;
            debug!(page, chars = page_text.chars().count(), "Page extracted");
            text.push_str(&page_marker(page));
            text.push_str(&page_text);
        }

        Ok(text.trim().to_string())
    }
}

/// Attach the page number to a failure, keeping timeouts distinguishable.
fn at_page(page: usize, err: FaroError) -> FaroError {
    match err {
        FaroError::ToolTimeout { .. } => err,
        FaroError::Extraction(msg) => FaroError::Extraction(format!("page {page}: {msg}")),
        other => FaroError::Extraction(format!("page {page}: {other}")),
    }
}
