// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Diacritic folding for OCR output.

use unicode_normalization::UnicodeNormalization;
use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

/// Remove diacritics by canonical decomposition (NFD) and dropping every
/// non-spacing mark (`Mn`). Spacing (`Mc`) and enclosing (`Me`) marks are
/// kept, as are whitespace and line breaks.
///
/// Folding is idempotent: `strip_accents(strip_accents(s)) == strip_accents(s)`.
pub fn strip_accents(text: &str) -> String {
    text.nfd()
        .filter(|c| c.general_category() != GeneralCategory::NonspacingMark)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_spanish_diacritics() {
        assert_eq!(strip_accents("Página"), "Pagina");
        assert_eq!(strip_accents("PETICIÓN año pingüino"), "PETICION ano pinguino");
    }

    #[test]
    fn preserves_line_structure() {
        let text = "línea uno\n\tlínea  dos\n";
        assert_eq!(strip_accents(text), "linea uno\n\tlinea  dos\n");
    }

    #[test]
    fn is_idempotent() {
        for sample in ["Señor Gómez", "ÁÉÍÓÚ ñ ü", "plain ascii", "", "e\u{0301}\u{0327}"] {
            let once = strip_accents(sample);
            assert_eq!(strip_accents(&once), once);
        }
    }

    #[test]
    fn drops_stray_combining_marks() {
        assert_eq!(strip_accents("a\u{0301}\u{0308}"), "a");
    }

    #[test]
    fn keeps_spacing_and_enclosing_marks() {
        // U+093F DEVANAGARI VOWEL SIGN I is Mc, U+20DD COMBINING ENCLOSING CIRCLE is Me.
        let text = "\u{0915}\u{093F} x\u{20DD}";
        assert_eq!(strip_accents(text), text);
        assert_eq!(strip_accents("ma\u{0301}s\u{20DD}"), "mas\u{20DD}");
    }
}
