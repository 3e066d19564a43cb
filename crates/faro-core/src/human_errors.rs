// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User-facing error messages for analysts.
//
// Analysts never see stage names, tool paths, or matched text: every error
// collapses to one Spanish apology. The severity and retry flag are for the
// caller, which decides whether to offer a retry.

use crate::error::FaroError;

/// The only failure text shown to an analyst.
pub const GENERIC_APOLOGY: &str =
    "Lo lamento. No puedo ayudarte en este momento. Intenta de nuevo más tarde.";

/// Severity of an error from the analyst's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Tool timeout or model hiccup; retrying may help.
    Transient,
    /// Deployment problem (missing font, bad tool path, bad config).
    Operator,
    /// The document itself cannot be processed.
    Permanent,
}

/// A user-facing error plus routing hints.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Text shown to the analyst.
    pub message: String,
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `FaroError` into the message an analyst sees.
pub fn humanize_error(err: &FaroError) -> HumanError {
    let (retriable, severity) = match err {
        FaroError::ToolTimeout { .. } | FaroError::Model(_) => (true, Severity::Transient),
        FaroError::Config(_) | FaroError::Render(_) | FaroError::Io(_) => {
            (false, Severity::Operator)
        }
        FaroError::Extraction(detail) if detail.contains("spawn") => (false, Severity::Operator),
        FaroError::Extraction(_)
        | FaroError::Image(_)
        | FaroError::Encoding(_)
        | FaroError::Redaction(_)
        | FaroError::Serialization(_) => (false, Severity::Permanent),
        FaroError::PipelineFailed { .. } => (true, Severity::Transient),
    };

    HumanError {
        message: GENERIC_APOLOGY.into(),
        retriable,
        severity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_error_uses_the_apology() {
        let errors = [
            FaroError::Extraction("page 2: tesseract exited with 1".into()),
            FaroError::Render("font missing".into()),
            FaroError::Model("503".into()),
            FaroError::PipelineFailed { case: "queja".into() },
        ];
        for err in &errors {
            assert_eq!(humanize_error(err).message, GENERIC_APOLOGY);
        }
    }

    #[test]
    fn details_never_leak() {
        let err = FaroError::Extraction("cannot open /home/analyst/cedula_123.pdf".into());
        assert!(!humanize_error(&err).message.contains("cedula_123"));
    }

    #[test]
    fn timeout_is_transient() {
        let err = FaroError::ToolTimeout {
            tool: "tesseract".into(),
            seconds: 120,
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn missing_font_is_operator_problem() {
        let human = humanize_error(&FaroError::Render("cannot read font".into()));
        assert_eq!(human.severity, Severity::Operator);
        assert!(!human.retriable);
    }
}
