// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The ordered PII rule table.
//
// Order is load-bearing: phone numbers are taken before generic digit runs,
// national IDs before account numbers, addresses before names. Reordering
// changes output and breaks the ordering tests in `redactor`.

use regex::Regex;
use tracing::debug;

use faro_core::error::{FaroError, Result};

use crate::exceptions::ExceptionSet;

/// What a rule writes in place of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement {
    /// Replace the whole match with a fixed token.
    Token(&'static str),
    /// Expand a capture template (`${lead}[CUENTA]`).
    Template(&'static str),
    /// Replace with a token unless every word of the match is protected.
    TokenUnlessExcepted(&'static str),
}

/// Predicate over the text preceding a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    None,
    /// Skip matches that follow a `$`, optionally separated by spaces or tabs.
    NotAfterCurrency,
}

impl Guard {
    fn blocks(&self, preceding: &str) -> bool {
        match self {
            Self::None => false,
            Self::NotAfterCurrency => preceding.trim_end_matches([' ', '\t']).ends_with('$'),
        }
    }
}

/// One named, stateless redaction step.
#[derive(Debug, Clone)]
pub struct RedactionRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub replacement: Replacement,
    pub guard: Guard,
}

impl RedactionRule {
    fn compile(
        name: &'static str,
        pattern: &str,
        replacement: Replacement,
        guard: Guard,
    ) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| FaroError::Redaction(format!("rule {name} failed to compile: {e}")))?;
        Ok(Self {
            name,
            pattern,
            replacement,
            guard,
        })
    }

    /// Apply this rule once over `text`, returning the new text and the
    /// number of replacements made.
    pub fn apply(&self, text: &str, exceptions: &ExceptionSet) -> (String, usize) {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        let mut count = 0;

        for caps in self.pattern.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            if self.guard.blocks(&text[..whole.start()]) {
                continue;
            }
            match self.replacement {
                Replacement::TokenUnlessExcepted(_) if exceptions.spares(whole.as_str()) => {
                    continue;
                }
                Replacement::Token(token) | Replacement::TokenUnlessExcepted(token) => {
                    out.push_str(&text[last..whole.start()]);
                    out.push_str(token);
                }
                Replacement::Template(template) => {
                    out.push_str(&text[last..whole.start()]);
                    caps.expand(template, &mut out);
                }
            }
            last = whole.end();
            count += 1;
        }

        if count == 0 {
            return (text.to_string(), 0);
        }
        out.push_str(&text[last..]);
        debug!(rule = self.name, replacements = count, "rule applied");
        (out, count)
    }
}

// -- Patterns -------------------------------------------------------------

const INVISIBLE_SPACES: &str = "[\u{00A0}\u{200B}]";

const EMAIL: &str = r"(?i)\b[\w.+-]+\s*(?:@|[(\[{<]\s*(?:@|at|arroba)\s*[)\]}>]|\s(?:at|arroba)\s)\s*[\w-]+(?:\.[\w-]+)*\.[a-z]{2,}\b";

const PROVIDER_DOMAIN: &str = r"(?i)\b\S{1,50}(?:gmail\.com|hotmail\.com|outlook\.com|yahoo\.com|live\.com|une\.net\.co|icloud\.com)\b";

const MOBILE_PHONE: &str = r"\b3\d{2}[\s.-]?\d{3}[\s.-]?\d{4}\b";

const NATIONAL_ID_DIGITS: &str = r"\b\d{8,10}\b";

const NATIONAL_ID_DOTTED: &str = r"\b\d{1,3}(?:\.\d{3}){2,3}\b";

const ACCOUNT_DIGITS: &str = r"\b(?:\d{20}|\d{16}|\d{10}|\d{9})\b";

const ACCOUNT_DASHED: &str = r"\b(?:\d{2,6}-){2,4}\d{2,6}\b";

const ACCOUNT_PHRASE: &str = r"(?i)(?P<lead>cuenta\s+(?:de\s+)?(?:ahorros?|corriente)[\sN°º.:]*)(?:\d{20}|\d{16}|\d{10}|\d{9})";

const ADDRESS: &str = r"(?i)\b(?:Calle|Carrera|Cra|Cr|Kra|Transversal|Diagonal|Avenida|Av\.?|Mz|Manzana|Anillo|Autopista|Circular)\s*\d+[a-z]?\s*(?:Bis\s*)?(?:#|No\.?)\s*\d+[a-z]?(?:\s*[-–]\s*\d+)?\b[\w \t,°.#-]{0,40}";

const PERSON_NAME: &str = r"\b(?:[A-ZÁÉÍÓÚÑ][a-záéíóúñ]+(?:\s+(?:de|del))?\s+)+[A-ZÁÉÍÓÚÑ][a-záéíóúñ]+\b|\b[A-ZÁÉÍÓÚÑ]{2,}(?:\s+[A-ZÁÉÍÓÚÑ]{2,})+\b";

const SIGNATURE: &str = r"\bAtentamente[,:]?\s+[A-ZÁÉÍÓÚÑ][A-Za-zÁÉÍÓÚÑáéíóúñ]+(?:[ \t]+[A-ZÁÉÍÓÚÑ][A-Za-zÁÉÍÓÚÑáéíóúñ]+)*";

const SELF_INTRODUCTION: &str = r"\b[Yy]o,\s*(?:[A-ZÁÉÍÓÚÑ]{2,}(?:\s+|,\s*)){0,5}[A-ZÁÉÍÓÚÑ]{2,}\b";

/// Compile the rule table in application order.
pub fn default_rules() -> Result<Vec<RedactionRule>> {
    use Guard::NotAfterCurrency;
    use Replacement::{Template, Token, TokenUnlessExcepted};

    Ok(vec![
        RedactionRule::compile("invisible_spaces", INVISIBLE_SPACES, Token(" "), Guard::None)?,
        RedactionRule::compile("email", EMAIL, Token("[CORREO]"), Guard::None)?,
        RedactionRule::compile("provider_domain", PROVIDER_DOMAIN, Token("[CORREO]"), Guard::None)?,
        RedactionRule::compile("mobile_phone", MOBILE_PHONE, Token("[TELÉFONO]"), Guard::None)?,
        RedactionRule::compile(
            "national_id_digits",
            NATIONAL_ID_DIGITS,
            Token("[CÉDULA]"),
            NotAfterCurrency,
        )?,
        RedactionRule::compile(
            "national_id_dotted",
            NATIONAL_ID_DOTTED,
            Token("[CÉDULA]"),
            NotAfterCurrency,
        )?,
        RedactionRule::compile("account_digits", ACCOUNT_DIGITS, Token("[CUENTA]"), Guard::None)?,
        RedactionRule::compile("account_dashed", ACCOUNT_DASHED, Token("[CUENTA]"), Guard::None)?,
        RedactionRule::compile(
            "account_phrase",
            ACCOUNT_PHRASE,
            Template("${lead}[CUENTA]"),
            Guard::None,
        )?,
        RedactionRule::compile("address", ADDRESS, Token("[DIRECCIÓN]"), Guard::None)?,
        RedactionRule::compile(
            "person_name",
            PERSON_NAME,
            TokenUnlessExcepted("[NOMBRE]"),
            Guard::None,
        )?,
        RedactionRule::compile(
            "signature",
            SIGNATURE,
            Token("Atentamente, [NOMBRE]"),
            Guard::None,
        )?,
        RedactionRule::compile(
            "self_introduction",
            SELF_INTRODUCTION,
            Token("Yo, [NOMBRE]"),
            Guard::None,
        )?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redactor::Redactor;

    fn rule(name: &str) -> RedactionRule {
        default_rules()
            .unwrap()
            .into_iter()
            .find(|r| r.name == name)
            .unwrap_or_else(|| panic!("no rule named {name}"))
    }

    fn run(name: &str, text: &str) -> String {
        rule(name).apply(text, &ExceptionSet::default()).0
    }

    #[test]
    fn table_has_thirteen_rules_in_order() {
        let names: Vec<_> = default_rules().unwrap().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            [
                "invisible_spaces",
                "email",
                "provider_domain",
                "mobile_phone",
                "national_id_digits",
                "national_id_dotted",
                "account_digits",
                "account_dashed",
                "account_phrase",
                "address",
                "person_name",
                "signature",
                "self_introduction",
            ]
        );
    }

    #[test]
    fn invisible_spaces_become_spaces() {
        assert_eq!(run("invisible_spaces", "a\u{00A0}b\u{200B}c"), "a b c");
    }

    #[test]
    fn email_plain_and_obfuscated() {
        assert_eq!(run("email", "escriba a juan.perez@gmail.com hoy"), "escriba a [CORREO] hoy");
        assert_eq!(run("email", "ana.r (arroba) empresa.com.co"), "[CORREO]");
        assert_eq!(run("email", "ana.r[at]empresa.co"), "[CORREO]");
        assert_eq!(run("email", "luis arroba correo.net"), "[CORREO]");
        assert_eq!(run("email", "LUIS@CORREO.NET."), "[CORREO].");
        assert_eq!(run("email", "ana.r(@)empresa.co"), "[CORREO]");
    }

    #[test]
    fn email_ignores_list_markers() {
        let text = "literal (a) anexo.Se solicita";
        assert_eq!(run("email", text), text);
        assert_eq!(Redactor::new().unwrap().redact(text), text);
    }

    #[test]
    fn provider_domain_without_at_sign() {
        assert_eq!(run("provider_domain", "contacto juanperezhotmail.com"), "contacto [CORREO]");
        assert_eq!(run("provider_domain", "nada que ver"), "nada que ver");
    }

    #[test]
    fn mobile_phone_with_separators() {
        assert_eq!(run("mobile_phone", "cel 300 123 4567"), "cel [TELÉFONO]");
        assert_eq!(run("mobile_phone", "cel 310-555-1234."), "cel [TELÉFONO].");
        assert_eq!(run("mobile_phone", "3151234567"), "[TELÉFONO]");
        assert_eq!(run("mobile_phone", "fijo 601 555 1234"), "fijo 601 555 1234");
    }

    #[test]
    fn national_id_skips_currency_amounts() {
        assert_eq!(run("national_id_digits", "CC 1020304050"), "CC [CÉDULA]");
        assert_eq!(run("national_id_digits", "valor $12345678"), "valor $12345678");
        assert_eq!(run("national_id_digits", "valor $ 12345678"), "valor $ 12345678");
        assert_eq!(run("national_id_digits", "1234567"), "1234567");
    }

    #[test]
    fn dotted_national_id() {
        assert_eq!(run("national_id_dotted", "C.C. 1.020.304.050"), "C.C. [CÉDULA]");
        assert_eq!(run("national_id_dotted", "cobro de $1.500.000"), "cobro de $1.500.000");
    }

    #[test]
    fn account_digit_lengths() {
        assert_eq!(run("account_digits", "123456789"), "[CUENTA]");
        assert_eq!(run("account_digits", "12345678901234567890"), "[CUENTA]");
        assert_eq!(run("account_digits", "12345678901"), "12345678901");
    }

    #[test]
    fn dashed_account() {
        assert_eq!(run("account_dashed", "cuenta 0012-3456-78"), "cuenta [CUENTA]");
        assert_eq!(run("account_dashed", "12-34"), "12-34");
    }

    #[test]
    fn account_phrase_keeps_lead() {
        assert_eq!(
            run("account_phrase", "Cuenta de Ahorros N° 123456789"),
            "Cuenta de Ahorros N° [CUENTA]"
        );
        assert_eq!(
            run("account_phrase", "cuenta corriente N1234567890"),
            "cuenta corriente N[CUENTA]"
        );
    }

    #[test]
    fn address_keywords() {
        assert_eq!(run("address", "vivo en Calle 45 # 12-34 barrio Centro\nfin"), "vivo en [DIRECCIÓN]\nfin");
        assert_eq!(run("address", "Cra 7 Bis No. 8a - 10"), "[DIRECCIÓN]");
        assert_eq!(run("address", "la calle principal"), "la calle principal");
    }

    #[test]
    fn person_name_title_and_caps() {
        assert_eq!(run("person_name", "firmado por Maria del Pilar Rojas hoy"), "firmado por [NOMBRE] hoy");
        assert_eq!(run("person_name", "JUAN CARLOS PEREZ GOMEZ"), "[NOMBRE]");
        assert_eq!(run("person_name", "BBVA COLOMBIA"), "BBVA COLOMBIA");
        assert_eq!(run("person_name", "BANCO GOMEZ"), "[NOMBRE]");
        assert_eq!(run("person_name", "Juan"), "Juan");
    }

    #[test]
    fn signature_single_word() {
        assert_eq!(run("signature", "Atentamente,\nMARIA"), "Atentamente, [NOMBRE]");
        assert_eq!(run("signature", "Atentamente: Pedro"), "Atentamente, [NOMBRE]");
    }

    #[test]
    fn self_introduction_keeps_trailing_separator() {
        assert_eq!(run("self_introduction", "Yo, ANA, identificada"), "Yo, [NOMBRE], identificada");
        assert_eq!(run("self_introduction", "yo, LUIS MORA solicito"), "Yo, [NOMBRE] solicito");
    }

    #[test]
    fn guard_reports_replacement_counts() {
        let (out, count) = rule("national_id_digits").apply("12345678 y $87654321 y 11223344", &ExceptionSet::default());
        assert_eq!(out, "[CÉDULA] y $87654321 y [CÉDULA]");
        assert_eq!(count, 2);
    }
}
