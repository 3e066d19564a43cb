// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! faro-privacy: PII scrubbing for OCR'd complaint documents.
//!
//! The redactor applies a fixed, ordered table of pattern rules (emails,
//! mobile numbers, national IDs, bank accounts, street addresses, personal
//! names) and protects institutional terms through an exception set. Source
//! documents are identified in logs only by their SHA-256 fingerprint.

pub mod exceptions;
pub mod integrity;
pub mod redactor;
pub mod rules;

pub use exceptions::ExceptionSet;
pub use integrity::{fingerprint_bytes, fingerprint_file, short_fingerprint};
pub use redactor::{RedactionStats, Redactor};
pub use rules::{Guard, RedactionRule, Replacement};
