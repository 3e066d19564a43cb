// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page image export: each page of a PDF as a base64 PNG for multimodal
// model input.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use faro_core::EncodedPage;
use faro_core::error::{FaroError, Result};
use tracing::{debug, instrument};

use crate::scan::render::PageRenderer;

pub struct PageEncoder {
    renderer: Box<dyn PageRenderer>,
    dpi: u32,
}

impl PageEncoder {
    pub fn new(renderer: Box<dyn PageRenderer>, dpi: u32) -> Self {
        Self { renderer, dpi }
    }

    /// Encode every page, in order. Any page failure fails the call.
    #[instrument(skip(self), fields(document = %document.display(), dpi = self.dpi))]
    pub fn encode_pages(&self, document: &Path) -> Result<Vec<EncodedPage>> {
        let pages = self.renderer.page_count(document).map_err(as_encoding)?;
        let mut encoded = Vec::with_capacity(pages);
        for page in 1..=pages {
            let png = self
                .renderer
                .render_page(document, page, self.dpi)
                .map_err(as_encoding)?;
            encoded.push(EncodedPage::png(STANDARD.encode(&png)));
        }
        debug!(pages = encoded.len(), "Pages encoded");
        Ok(encoded)
    }
}

fn as_encoding(err: FaroError) -> FaroError {
    match err {
        FaroError::Encoding(_) => err,
        other => FaroError::Encoding(other.to_string()),
    }
}
