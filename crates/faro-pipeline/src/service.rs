// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tool-layer service: the two calls an agent runtime makes against the
// pipeline, `redact` and `encode_pages_as_images`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use faro_core::error::{FaroError, Result};
use faro_core::{EncodedPage, FaroConfig, RedactionOutcome};
use faro_document::{
    PageEncoder, PageOcrExtractor, PopplerRenderer, RedactedDocumentBuilder, TesseractRecognizer,
};
use faro_privacy::Redactor;
use tracing::{info, instrument};

use crate::cases::CaseStore;
use crate::orchestrator::RedactionOrchestrator;

/// Operations exposed to the assistant layer.
pub trait DocumentTools: Send + Sync {
    /// Redact `document` and return the artifact path.
    fn redact(&self, document: &Path) -> Result<PathBuf>;

    /// Every page of `pdf` as a base64 PNG, in page order.
    fn encode_pages_as_images(&self, pdf: &Path) -> Result<Vec<EncodedPage>>;
}

pub struct RedactionService {
    cases: CaseStore,
    orchestrator: RedactionOrchestrator,
    encoder: PageEncoder,
}

impl RedactionService {
    pub fn new(cases: CaseStore, orchestrator: RedactionOrchestrator, encoder: PageEncoder) -> Self {
        Self {
            cases,
            orchestrator,
            encoder,
        }
    }

    /// Wire Poppler, Tesseract, and the printpdf builder from configuration.
    pub fn from_config(config: &FaroConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.ocr.page_timeout_secs);
        let pdftoppm = config.tools.pdftoppm_executable();

        let extractor = PageOcrExtractor::new(
            Box::new(PopplerRenderer::new(&pdftoppm, timeout)),
            Box::new(TesseractRecognizer::new(
                config.tools.tesseract_executable(),
                &config.ocr,
            )),
            config.ocr.dpi,
        );
        let builder = RedactedDocumentBuilder::new(&config.font_path, config.paper_size);
        let orchestrator =
            RedactionOrchestrator::new(Box::new(extractor), Box::new(builder), Redactor::new()?);
        let encoder = PageEncoder::new(
            Box::new(PopplerRenderer::new(pdftoppm, timeout)),
            config.preview_dpi,
        );

        Ok(Self::new(
            CaseStore::new(&config.cases_root),
            orchestrator,
            encoder,
        ))
    }

    pub fn cases(&self) -> &CaseStore {
        &self.cases
    }

    /// Run the pipeline for `document` inside its case directory.
    #[instrument(skip(self), fields(document = %document.display()))]
    pub fn redact_outcome(&self, document: &Path) -> Result<(String, RedactionOutcome)> {
        let case = self.cases.open(document)?;
        let outcome = self
            .orchestrator
            .run(document, &case.redacted_artifact_path());
        info!(case = %case.case_id(), outcome = ?outcome, "Redaction requested");
        Ok((case.case_id().to_string(), outcome))
    }
}

impl DocumentTools for RedactionService {
    fn redact(&self, document: &Path) -> Result<PathBuf> {
        match self.redact_outcome(document)? {
            (_, RedactionOutcome::Fresh(path) | RedactionOutcome::Cached(path)) => Ok(path),
            (case, RedactionOutcome::Failed) => Err(FaroError::PipelineFailed { case }),
        }
    }

    fn encode_pages_as_images(&self, pdf: &Path) -> Result<Vec<EncodedPage>> {
        self.encoder.encode_pages(pdf)
    }
}
