// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Faro.

use thiserror::Error;

/// Top-level error type for all Faro operations.
#[derive(Debug, Error)]
pub enum FaroError {
    // -- Pipeline stages --
    #[error("text extraction failed: {0}")]
    Extraction(String),

    #[error("redaction failed: {0}")]
    Redaction(String),

    #[error("redacted document rendering failed: {0}")]
    Render(String),

    #[error("page image encoding failed: {0}")]
    Encoding(String),

    #[error("redaction pipeline failed for case {case}")]
    PipelineFailed { case: String },

    // -- Collaborators --
    #[error("image processing failed: {0}")]
    Image(String),

    #[error("{tool} did not finish within {seconds}s")]
    ToolTimeout { tool: String, seconds: u64 },

    #[error("chat model error: {0}")]
    Model(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FaroError {
    /// Name of the pipeline stage this error belongs to, if any.
    pub fn stage(&self) -> Option<&'static str> {
        match self {
            Self::Extraction(_) | Self::Image(_) | Self::ToolTimeout { .. } => Some("extracting"),
            Self::Redaction(_) => Some("redacting"),
            Self::Render(_) => Some("rendering"),
            Self::Encoding(_) => Some("encoding"),
            _ => None,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FaroError>;
