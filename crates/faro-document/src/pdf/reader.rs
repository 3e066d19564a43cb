// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader: opens source documents with `lopdf` to learn their page count
// before rasterization.

use std::path::Path;

use faro_core::error::{FaroError, Result};
use lopdf::Document;
use tracing::{debug, instrument};

/// Read-only view of an existing PDF.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        let document = Document::load(path_ref).map_err(|err| {
            FaroError::Extraction(format!("failed to open {}: {err}", path_ref.display()))
        })?;
        debug!(pages = document.get_pages().len(), "PDF loaded");
        Ok(Self { document })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data)
            .map_err(|err| FaroError::Extraction(format!("failed to load PDF from memory: {err}")))?;
        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::{Object, dictionary};

    /// Build an empty-paged PDF with `pages` A4 pages.
    pub(crate) fn blank_pdf(pages: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let kids: Vec<Object> = (0..pages)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                })
                .into()
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn counts_pages() {
        let reader = PdfReader::from_bytes(&blank_pdf(3)).unwrap();
        assert_eq!(reader.page_count(), 3);
    }

    #[test]
    fn opens_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queja.pdf");
        std::fs::write(&path, blank_pdf(2)).unwrap();
        assert_eq!(PdfReader::open(&path).unwrap().page_count(), 2);
    }

    #[test]
    fn garbage_is_extraction_error() {
        let err = PdfReader::from_bytes(b"%PDF-nope").err().unwrap();
        assert!(matches!(err, FaroError::Extraction(_)));
    }
}
