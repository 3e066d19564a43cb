// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Faro redaction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{FaroError, Result};

/// Unique identifier for one orchestrator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Case identifier: the uploaded document's file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(String);

impl CaseId {
    /// Derive the case id from a source document path.
    pub fn from_document(path: &Path) -> Result<Self> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                FaroError::Config(format!("cannot derive a case id from {}", path.display()))
            })?;
        Ok(Self(stem.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle states of a redaction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStage {
    NotStarted,
    /// Rendering pages and running OCR.
    Extracting,
    /// Applying the PII rules to the extracted text.
    Redacting,
    /// Writing the redacted PDF.
    Rendering,
    Done,
    Failed,
}

impl PipelineStage {
    /// Stable lowercase name used in structured logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Extracting => "extracting",
            Self::Redacting => "redacting",
            Self::Rendering => "rendering",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Stage that follows a successful completion of `self`.
    pub fn next(&self) -> Self {
        match self {
            Self::NotStarted => Self::Extracting,
            Self::Extracting => Self::Redacting,
            Self::Redacting => Self::Rendering,
            Self::Rendering | Self::Done => Self::Done,
            Self::Failed => Self::Failed,
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of asking the orchestrator for a redacted artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedactionOutcome {
    /// The pipeline ran and produced a new artifact.
    Fresh(PathBuf),
    /// An artifact already existed; no stage ran.
    Cached(PathBuf),
    /// A stage failed; nothing was written.
    Failed,
}

impl RedactionOutcome {
    pub fn artifact(&self) -> Option<&Path> {
        match self {
            Self::Fresh(path) | Self::Cached(path) => Some(path),
            Self::Failed => None,
        }
    }
}

/// One page of a document encoded for a multimodal model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedPage {
    pub mime_type: String,
    /// Base64 (standard alphabet, padded) image bytes.
    pub data: String,
}

impl EncodedPage {
    pub fn png(data: String) -> Self {
        Self {
            mime_type: "image/png".into(),
            data,
        }
    }
}

/// Standard paper sizes for the redacted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    A4,
    Letter,
    Legal,
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            Self::A4 => (210.0, 297.0),
            Self::Letter => (215.9, 279.4),
            Self::Legal => (215.9, 355.6),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_id_is_the_file_stem() {
        let id = CaseId::from_document(Path::new("/tmp/uploads/queja_2024.pdf")).unwrap();
        assert_eq!(id.as_str(), "queja_2024");
    }

    #[test]
    fn case_id_rejects_pathless_input() {
        assert!(CaseId::from_document(Path::new("")).is_err());
    }

    #[test]
    fn stages_advance_in_order() {
        let mut stage = PipelineStage::NotStarted;
        let mut seen = vec![stage];
        while !stage.is_terminal() {
            stage = stage.next();
            seen.push(stage);
        }
        assert_eq!(
            seen,
            vec![
                PipelineStage::NotStarted,
                PipelineStage::Extracting,
                PipelineStage::Redacting,
                PipelineStage::Rendering,
                PipelineStage::Done,
            ]
        );
    }

    #[test]
    fn failed_is_terminal() {
        assert!(PipelineStage::Failed.is_terminal());
        assert_eq!(PipelineStage::Failed.next(), PipelineStage::Failed);
    }

    #[test]
    fn failed_outcome_has_no_artifact() {
        assert!(RedactionOutcome::Failed.artifact().is_none());
        let cached = RedactionOutcome::Cached(PathBuf::from("a.pdf"));
        assert_eq!(cached.artifact(), Some(Path::new("a.pdf")));
    }
}
