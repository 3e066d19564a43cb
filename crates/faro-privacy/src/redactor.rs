// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PII redactor: runs the rule table over extracted text.

use serde::Serialize;
use tracing::{debug, instrument};

use faro_core::error::Result;

use crate::exceptions::ExceptionSet;
use crate::rules::{RedactionRule, default_rules};

/// Per-rule replacement counts from one redaction pass.
///
/// Carries counts only. Matched text never leaves the redactor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RedactionStats {
    pub per_rule: Vec<(&'static str, usize)>,
}

impl RedactionStats {
    pub fn total(&self) -> usize {
        self.per_rule.iter().map(|(_, n)| n).sum()
    }

    pub fn count(&self, rule: &str) -> usize {
        self.per_rule
            .iter()
            .find(|(name, _)| *name == rule)
            .map_or(0, |(_, n)| *n)
    }
}

/// Ordered, deterministic PII scrubber.
#[derive(Debug, Clone)]
pub struct Redactor {
    rules: Vec<RedactionRule>,
    exceptions: ExceptionSet,
}

impl Redactor {
    /// Compile the standard rule table with the default exception set.
    pub fn new() -> Result<Self> {
        Self::with_exceptions(ExceptionSet::default())
    }

    pub fn with_exceptions(exceptions: ExceptionSet) -> Result<Self> {
        Ok(Self {
            rules: default_rules()?,
            exceptions,
        })
    }

    pub fn rules(&self) -> &[RedactionRule] {
        &self.rules
    }

    /// Mask every PII category in `text`.
    pub fn redact(&self, text: &str) -> String {
        self.redact_with_stats(text).0
    }

    #[instrument(skip_all, fields(input_chars = text.chars().count()))]
    pub fn redact_with_stats(&self, text: &str) -> (String, RedactionStats) {
        let mut current = text.to_string();
        let mut stats = RedactionStats::default();
        for rule in &self.rules {
            let (next, count) = rule.apply(&current, &self.exceptions);
            stats.per_rule.push((rule.name, count));
            current = next;
        }
        debug!(replacements = stats.total(), "redaction pass complete");
        (current, stats)
    }
}
