// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline: page rasterization, optical character recognition, and
// page-ordered text extraction.

pub mod extract;
pub mod ocr;
pub mod render;

pub use extract::PageOcrExtractor;
pub use ocr::TesseractRecognizer;
pub use render::PopplerRenderer;
