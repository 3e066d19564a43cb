// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// faro-document: Document processing for the Faro redaction pipeline.
//
// Provides page rasterization (Poppler), OCR (Tesseract), page image
// normalization (grayscale + Otsu), the redacted PDF builder, and base64 page
// export for multimodal models. External tools always run under a deadline.

pub mod image;
pub mod pdf;
pub mod scan;
pub mod tool;

// Re-export the primary structs so callers can use `faro_document::PdfReader` etc.
pub use crate::image::processor::{ImageProcessor, normalize_page};
pub use pdf::encode::PageEncoder;
pub use pdf::reader::PdfReader;
pub use pdf::writer::{DocumentBuilder, PageLayout, RedactedDocumentBuilder};
pub use scan::extract::{DocumentExtractor, PageOcrExtractor};
pub use scan::ocr::{TesseractRecognizer, TextRecognizer};
pub use scan::render::{PageRenderer, PopplerRenderer};
