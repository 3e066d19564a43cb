// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document fingerprints.
//
// Logs identify a source document by its SHA-256 digest so that runs can be
// correlated without writing file names or content into the log stream.

use faro_core::error::Result;
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
pub fn fingerprint_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Stream a file through SHA-256.
pub fn fingerprint_file(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// First 12 hex characters, enough to tell runs apart in a log line.
pub fn short_fingerprint(full: &str) -> &str {
    full.get(..12).unwrap_or(full)
}
