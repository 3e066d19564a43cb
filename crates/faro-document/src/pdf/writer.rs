// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Redacted document builder. Lays redacted text out on fixed-geometry pages
// with an embedded TrueType font so accented glyphs and bracketed tokens
// survive. Each page is a flat list of printpdf `Op`s, one text section per
// line.

use std::io::Write;
use std::path::{Path, PathBuf};

use faro_core::PaperSize;
use faro_core::error::{FaroError, Result};
use printpdf::{
    FontId, Mm, Op, ParsedFont, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt,
    TextItem,
};
use tracing::{debug, info, instrument};

/// Renders final text into a document artifact at `output`.
pub trait DocumentBuilder: Send + Sync {
    fn build(&self, text: &str, output: &Path) -> Result<()>;
}

/// Page geometry in millimetres and points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub paper_size: PaperSize,
    pub margin_left_mm: f32,
    pub margin_top_mm: f32,
    pub margin_right_mm: f32,
    /// Automatic page break trigger distance from the bottom edge.
    pub margin_bottom_mm: f32,
    pub font_size_pt: f32,
    pub line_height_mm: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            margin_left_mm: 10.0,
            margin_top_mm: 10.0,
            margin_right_mm: 10.0,
            margin_bottom_mm: 15.0,
            font_size_pt: 12.0,
            line_height_mm: 10.0,
        }
    }
}

impl PageLayout {
    pub fn for_paper(paper_size: PaperSize) -> Self {
        Self {
            paper_size,
            ..Self::default()
        }
    }

    /// Lines that fit between the top margin and the page-break trigger.
    pub fn lines_per_page(&self) -> usize {
        let (_, h) = self.paper_size.dimensions_mm();
        let usable = h - self.margin_top_mm - self.margin_bottom_mm;
        ((usable / self.line_height_mm).floor() as usize).max(1)
    }

    /// Estimated characters per line. Average glyph advance is taken as half
    /// the em size (1pt = 0.3528mm).
    pub fn chars_per_line(&self) -> usize {
        let (w, _) = self.paper_size.dimensions_mm();
        let usable = w - self.margin_left_mm - self.margin_right_mm;
        let avg_char_width_mm = 0.50 * self.font_size_pt * 0.3528;
        ((usable / avg_char_width_mm) as usize).max(1)
    }

    /// Split text into pages of wrapped lines. Every input line yields at
    /// least one output line, so blank lines survive as vertical space.
    pub fn paginate(&self, text: &str) -> Vec<Vec<String>> {
        let lines = wrap_text(text, self.chars_per_line());
        let per_page = self.lines_per_page();
        let mut pages: Vec<Vec<String>> = lines.chunks(per_page).map(<[String]>::to_vec).collect();
        if pages.is_empty() {
            pages.push(Vec::new());
        }
        pages
    }
}

/// Writes redacted text to a PDF using an external Unicode font.
pub struct RedactedDocumentBuilder {
    font_path: PathBuf,
    layout: PageLayout,
    title: String,
}

impl RedactedDocumentBuilder {
    pub fn new(font_path: impl Into<PathBuf>, paper_size: PaperSize) -> Self {
        Self {
            font_path: font_path.into(),
            layout: PageLayout::for_paper(paper_size),
            title: "Documento anonimizado".into(),
        }
    }

    fn load_font(&self, doc: &mut PdfDocument) -> Result<FontId> {
        let bytes = std::fs::read(&self.font_path).map_err(|err| {
            FaroError::Render(format!(
                "cannot read font {}: {err}",
                self.font_path.display()
            ))
        })?;
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let font = ParsedFont::from_bytes(&bytes, 0, &mut warnings).ok_or_else(|| {
            FaroError::Render(format!(
                "{} is not a usable TrueType font",
                self.font_path.display()
            ))
        })?;
        Ok(doc.add_font(&font))
    }

    /// Lay out `text` and serialise the PDF.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn render(&self, text: &str) -> Result<Vec<u8>> {
        let layout = &self.layout;
        let (w_mm, h_mm) = layout.paper_size.dimensions_mm();
        let (page_w, page_h) = (Mm(w_mm), Mm(h_mm));

        let mut doc = PdfDocument::new(&self.title);
        let font = self.load_font(&mut doc)?;

        let page_h_pt = page_h.into_pt().0;
        let left_pt = Mm(layout.margin_left_mm).into_pt().0;
        let top_pt = Mm(layout.margin_top_mm).into_pt().0;
        let line_h_pt = Mm(layout.line_height_mm).into_pt().0;
        // Baseline sits in the lower part of each line cell.
        let baseline_pt = line_h_pt * 0.5 + layout.font_size_pt * 0.35;

        let paginated = layout.paginate(text);
        let mut pages: Vec<PdfPage> = Vec::with_capacity(paginated.len());
        for lines in &paginated {
            let mut ops: Vec<Op> = Vec::new();
            for (idx, line) in lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let y_pt = page_h_pt - top_pt - idx as f32 * line_h_pt - baseline_pt;
                ops.push(Op::StartTextSection);
                ops.push(Op::SetTextCursor {
                    pos: Point {
                        x: Pt(left_pt),
                        y: Pt(y_pt),
                    },
                });
                ops.push(Op::SetFontSize {
                    size: Pt(layout.font_size_pt),
                    font: font.clone(),
                });
                ops.push(Op::WriteText {
                    items: vec![TextItem::Text(line.clone())],
                    font: font.clone(),
                });
                ops.push(Op::EndTextSection);
            }
            pages.push(PdfPage::new(page_w, page_h, ops));
        }

        doc.with_pages(pages);
        debug!(pages = paginated.len(), "Text layout complete");

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
    }
}

impl DocumentBuilder for RedactedDocumentBuilder {
    /// Render and persist atomically: the PDF is written to a temporary file
    /// beside `output` and renamed into place, so `output` never exists in a
    /// half-written state.
    #[instrument(skip(self, text), fields(output = %output.display()))]
    fn build(&self, text: &str, output: &Path) -> Result<()> {
        let bytes = self.render(text)?;

        let parent = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let render_err = |err: std::io::Error| {
            FaroError::Render(format!("cannot write {}: {err}", output.display()))
        };
        let mut staging = tempfile::NamedTempFile::new_in(parent).map_err(render_err)?;
        staging.write_all(&bytes).map_err(render_err)?;
        staging
            .persist(output)
            .map_err(|err| render_err(err.error))?;

        info!(bytes = bytes.len(), "Redacted document written");
        Ok(())
    }
}

// -- Text wrapping helper -----------------------------------------------------

/// Wrap a multi-line string so that no line exceeds `max_width` characters.
///
/// Width is counted in chars, not bytes. Oversized words are split across
/// lines.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut result = Vec::new();

    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            result.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_len = 0usize;

        for word in words {
            let word_len = word.chars().count();
            if word_len > max_width {
                if !current.is_empty() {
                    result.push(std::mem::take(&mut current));
                }
                let chars: Vec<char> = word.chars().collect();
                let mut chunks = chars.chunks(max_width).peekable();
                while let Some(chunk) = chunks.next() {
                    if chunks.peek().is_some() {
                        result.push(chunk.iter().collect());
                    } else {
                        current = chunk.iter().collect();
                        current_len = chunk.len();
                    }
                }
            } else if current.is_empty() {
                current.push_str(word);
                current_len = word_len;
            } else if current_len + 1 + word_len <= max_width {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
            } else {
                result.push(std::mem::replace(&mut current, word.to_string()));
                current_len = word_len;
            }
        }

        if !current.is_empty() {
            result.push(current);
        }
    }

    result
}
