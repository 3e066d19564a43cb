// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Institutional and legal terms that the name rule must never mask.

use std::collections::HashSet;

use faro_core::text::strip_accents;

/// Words in this set are never treated as part of a personal name.
const DEFAULT_TERMS: &[&str] = &[
    "BBVA",
    "NET",
    "CC",
    "SUPERINTENDENCIA",
    "BANCO",
    "COLOMBIA",
    "SURA",
    "DIAN",
    "ICBF",
    "EPS",
    "ADRES",
    "AV",
    "CEDULA",
    "DERECHO",
    "DERECHOS",
    "PETICION",
    "NO",
    "NI",
    "PSE",
    "BILBAO",
    "VIZCAYA",
    "FUNDAMENTOS",
];

/// Joining particles inside Spanish names ("Ruiz de la Cruz").
const CONNECTORS: &[&str] = &["DE", "DEL"];

/// Set of uppercase, accent-free protected terms.
#[derive(Debug, Clone)]
pub struct ExceptionSet {
    terms: HashSet<String>,
}

impl Default for ExceptionSet {
    fn default() -> Self {
        Self::from_terms(DEFAULT_TERMS.iter().copied())
    }
}

impl ExceptionSet {
    /// Build a set from arbitrary terms; each is folded to its canonical form.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms.into_iter().map(|t| canonical(t.as_ref())).collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.terms.contains(&canonical(word))
    }

    /// A matched name span is spared only when every word in it, ignoring
    /// connectors, is a protected term.
    pub fn spares(&self, span: &str) -> bool {
        span.split_whitespace()
            .map(canonical)
            .filter(|word| !CONNECTORS.contains(&word.as_str()))
            .all(|word| self.terms.contains(&word))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

fn canonical(word: &str) -> String {
    strip_accents(word.trim()).to_uppercase()
}
