// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Redaction orchestrator: sequences extraction, redaction, and rendering for
// one source document, with an artifact cache in front.
//
// Stage lifecycle:
//
//   NotStarted -> Extracting -> Redacting -> Rendering -> Done
//                     |             |            |
//                     +-------------+------------+--> Failed
//
// A run is all-or-nothing. Nothing is written unless every stage succeeds,
// and a failed run leaves no artifact, so the next call starts over.

use std::path::Path;

use faro_core::error::Result;
use faro_core::{PipelineStage, RedactionOutcome, RunId};
use faro_document::{DocumentBuilder, DocumentExtractor};
use faro_privacy::{Redactor, fingerprint_file, short_fingerprint};
use tracing::{debug, error, info, info_span, warn};

pub struct RedactionOrchestrator {
    extractor: Box<dyn DocumentExtractor>,
    builder: Box<dyn DocumentBuilder>,
    redactor: Redactor,
}

impl RedactionOrchestrator {
    pub fn new(
        extractor: Box<dyn DocumentExtractor>,
        builder: Box<dyn DocumentBuilder>,
        redactor: Redactor,
    ) -> Self {
        Self {
            extractor,
            builder,
            redactor,
        }
    }

    /// Produce the redacted artifact for `source` at `output`.
    ///
    /// An existing `output` is returned as [`RedactionOutcome::Cached`]
    /// without running any stage.
    pub fn run(&self, source: &Path, output: &Path) -> RedactionOutcome {
        if output.exists() {
            info!(output = %output.display(), "Redacted artifact already present, skipping pipeline");
            return RedactionOutcome::Cached(output.to_path_buf());
        }

        let run_id = RunId::new();
        let span = info_span!("redaction_run", %run_id);
        let _guard = span.enter();

        match fingerprint_file(source) {
            Ok(full) => info!(source_sha256 = short_fingerprint(&full), "Redaction run started"),
            Err(err) => warn!(error = %err, "Could not fingerprint source document"),
        }

        let mut stage = PipelineStage::NotStarted;
        match self.execute(source, output, &mut stage) {
            Ok(()) => {
                stage = stage.next();
                info!(stage = %stage, output = %output.display(), "Redaction run complete");
                RedactionOutcome::Fresh(output.to_path_buf())
            }
            Err(err) => {
                error!(stage = %stage, error = %err, "Redaction stage failed");
                debug!(stage = %PipelineStage::Failed, "Run abandoned");
                RedactionOutcome::Failed
            }
        }
    }

    fn execute(&self, source: &Path, output: &Path, stage: &mut PipelineStage) -> Result<()> {
        *stage = stage.next();
        info!(stage = %stage, "Stage started");
        let text = self.extractor.extract(source)?;
        debug!(stage = %stage, chars = text.chars().count(), "Stage finished");

        *stage = stage.next();
        info!(stage = %stage, "Stage started");
        let (redacted, stats) = self.redactor.redact_with_stats(&text);
        info!(stage = %stage, replacements = stats.total(), "Stage finished");
        debug!(per_rule = ?stats.per_rule, "Replacement counts");

        *stage = stage.next();
        info!(stage = %stage, "Stage started");
        self.builder.build(&redacted, output)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faro_core::FaroError;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Probe {
        extracts: Arc<AtomicUsize>,
        builds: Arc<AtomicUsize>,
        rendered: Arc<Mutex<Option<String>>>,
    }

    struct StubExtractor {
        probe: Probe,
        text: &'static str,
        fail_first: bool,
    }

    impl DocumentExtractor for StubExtractor {
        fn extract(&self, _: &Path) -> Result<String> {
            let n = self.probe.extracts.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && n == 0 {
                return Err(FaroError::Extraction("page 1: tesseract exited with 1".into()));
            }
            Ok(self.text.to_string())
        }
    }

    struct StubBuilder {
        probe: Probe,
        fail: bool,
    }

    impl DocumentBuilder for StubBuilder {
        fn build(&self, text: &str, output: &Path) -> Result<()> {
            self.probe.builds.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FaroError::Render("cannot read font".into()));
            }
            *self.probe.rendered.lock().unwrap() = Some(text.to_string());
            std::fs::write(output, text)?;
            Ok(())
        }
    }

    const LETTER: &str = "--- Página 1 ---\n\nYo, JUAN PEREZ, con CC 1020304050 y correo juan@gmail.com";

    fn orchestrator(probe: &Probe, fail_first: bool, fail_build: bool) -> RedactionOrchestrator {
        RedactionOrchestrator::new(
            Box::new(StubExtractor {
                probe: probe.clone(),
                text: LETTER,
                fail_first,
            }),
            Box::new(StubBuilder {
                probe: probe.clone(),
                fail: fail_build,
            }),
            Redactor::new().unwrap(),
        )
    }

    fn paths() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("queja.pdf");
        std::fs::write(&source, b"%PDF-1.5 stub").unwrap();
        let output = dir.path().join("queja_encrypted.pdf");
        (dir, source, output)
    }

    #[test]
    fn cached_artifact_skips_every_stage() {
        let (_dir, source, output) = paths();
        std::fs::write(&output, b"existing").unwrap();
        let probe = Probe::default();

        let outcome = orchestrator(&probe, false, false).run(&source, &output);

        assert_eq!(outcome, RedactionOutcome::Cached(output.clone()));
        assert_eq!(probe.extracts.load(Ordering::SeqCst), 0);
        assert_eq!(probe.builds.load(Ordering::SeqCst), 0);
        assert_eq!(std::fs::read(&output).unwrap(), b"existing");
    }

    #[test]
    fn fresh_run_renders_redacted_text() {
        let (_dir, source, output) = paths();
        let probe = Probe::default();

        let outcome = orchestrator(&probe, false, false).run(&source, &output);

        assert_eq!(outcome, RedactionOutcome::Fresh(output.clone()));
        let rendered = probe.rendered.lock().unwrap().clone().unwrap();
        assert_eq!(
            rendered,
            "--- Página 1 ---\n\nYo, [NOMBRE], con CC [CÉDULA] y correo [CORREO]"
        );
        assert!(output.exists());
    }

    #[test]
    fn second_call_hits_the_cache() {
        let (_dir, source, output) = paths();
        let probe = Probe::default();
        let orchestrator = orchestrator(&probe, false, false);

        assert!(matches!(orchestrator.run(&source, &output), RedactionOutcome::Fresh(_)));
        assert!(matches!(orchestrator.run(&source, &output), RedactionOutcome::Cached(_)));
        assert_eq!(probe.extracts.load(Ordering::SeqCst), 1);
        assert_eq!(probe.builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn extraction_failure_stops_before_rendering() {
        let (_dir, source, output) = paths();
        let probe = Probe::default();

        let outcome = orchestrator(&probe, true, false).run(&source, &output);

        assert_eq!(outcome, RedactionOutcome::Failed);
        assert_eq!(probe.builds.load(Ordering::SeqCst), 0);
        assert!(!output.exists());
    }

    #[test]
    fn render_failure_leaves_no_artifact() {
        let (_dir, source, output) = paths();
        let probe = Probe::default();

        let outcome = orchestrator(&probe, false, true).run(&source, &output);

        assert_eq!(outcome, RedactionOutcome::Failed);
        assert!(!output.exists());
    }

    #[test]
    fn retry_after_failure_starts_over() {
        let (_dir, source, output) = paths();
        let probe = Probe::default();
        let orchestrator = orchestrator(&probe, true, false);

        assert_eq!(orchestrator.run(&source, &output), RedactionOutcome::Failed);
        assert_eq!(orchestrator.run(&source, &output), RedactionOutcome::Fresh(output.clone()));
        assert_eq!(probe.extracts.load(Ordering::SeqCst), 2);
    }
}
