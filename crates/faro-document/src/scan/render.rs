// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page rasterization through Poppler's `pdftoppm`.
//
// Page counts come from lopdf. Files lopdf cannot parse are handed to
// Poppler's `pdfinfo`, found next to `pdftoppm`, before giving up.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use faro_core::error::{FaroError, Result};
use tracing::{debug, instrument, warn};

use crate::pdf::reader::PdfReader;
use crate::tool::run_with_deadline;

/// Turns one page of a document into an encoded raster.
pub trait PageRenderer: Send + Sync {
    fn page_count(&self, document: &Path) -> Result<usize>;

    /// Render page `page` (1-based) at `dpi` and return PNG bytes.
    fn render_page(&self, document: &Path, page: usize, dpi: u32) -> Result<Vec<u8>>;
}

/// `pdftoppm`-backed renderer, invoked once per page so the deadline
/// applies per page.
#[derive(Debug, Clone)]
pub struct PopplerRenderer {
    executable: PathBuf,
    timeout: Duration,
}

impl PopplerRenderer {
    pub fn new(executable: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            executable: executable.into(),
            timeout,
        }
    }

    fn pdfinfo_executable(&self) -> PathBuf {
        let name = format!("pdfinfo{}", std::env::consts::EXE_SUFFIX);
        match self.executable.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(name),
            _ => PathBuf::from(name),
        }
    }

    fn pdfinfo_page_count(&self, document: &Path) -> Result<usize> {
        let mut cmd = Command::new(self.pdfinfo_executable());
        cmd.arg(document);
        let output = run_with_deadline(cmd, "pdfinfo", self.timeout)?;
        parse_pdfinfo_pages(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
            FaroError::Extraction(format!(
                "pdfinfo reported no page count for {}",
                document.display()
            ))
        })
    }
}

/// Read the `Pages:` line of a `pdfinfo` report.
fn parse_pdfinfo_pages(report: &str) -> Option<usize> {
    report
        .lines()
        .find_map(|line| line.strip_prefix("Pages:"))
        .and_then(|count| count.trim().parse().ok())
}

impl PageRenderer for PopplerRenderer {
    fn page_count(&self, document: &Path) -> Result<usize> {
        match PdfReader::open(document) {
            Ok(reader) => Ok(reader.page_count()),
            Err(err) => {
                warn!(error = %err, "lopdf could not read the document, asking pdfinfo");
                self.pdfinfo_page_count(document)
            }
        }
    }

    #[instrument(skip(self), fields(document = %document.display()))]
    fn render_page(&self, document: &Path, page: usize, dpi: u32) -> Result<Vec<u8>> {
        let scratch = tempfile::tempdir()?;
        let prefix = scratch.path().join("page");
        let page_arg = page.to_string();

        let mut cmd = Command::new(&self.executable);
        cmd.arg("-r")
            .arg(dpi.to_string())
            .arg("-f")
            .arg(&page_arg)
            .arg("-l")
            .arg(&page_arg)
            .arg("-png")
            .arg("-singlefile")
            .arg(document)
            .arg(&prefix);
        run_with_deadline(cmd, "pdftoppm", self.timeout)?;

        let png = prefix.with_extension("png");
        let bytes = std::fs::read(&png).map_err(|err| {
            FaroError::Extraction(format!("pdftoppm produced no image for page {page}: {err}"))
        })?;
        debug!(page, bytes = bytes.len(), "Page rendered");
        Ok(bytes)
    }
}
