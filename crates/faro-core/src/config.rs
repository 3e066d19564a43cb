// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.
//
// Loaded once at startup from an optional TOML file, then overridden by
// FARO_* environment variables. Components receive the values they need
// through their constructors and never read process state themselves.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FaroError, Result};
use crate::types::PaperSize;

/// Locations of the external executables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    /// `pdftoppm` executable, or the Poppler `bin` directory containing it.
    pub pdftoppm: PathBuf,
    /// `tesseract` executable.
    pub tesseract: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            pdftoppm: PathBuf::from("pdftoppm"),
            tesseract: PathBuf::from("tesseract"),
        }
    }
}

impl ToolPaths {
    /// Resolve the renderer executable, accepting a Poppler directory.
    pub fn pdftoppm_executable(&self) -> PathBuf {
        resolve_in_dir(&self.pdftoppm, "pdftoppm")
    }

    pub fn tesseract_executable(&self) -> PathBuf {
        resolve_in_dir(&self.tesseract, "tesseract")
    }
}

fn resolve_in_dir(path: &Path, binary: &str) -> PathBuf {
    if path.is_dir() {
        path.join(format!("{binary}{}", std::env::consts::EXE_SUFFIX))
    } else {
        path.to_path_buf()
    }
}

/// OCR parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Rasterization resolution for OCR.
    pub dpi: u32,
    /// Tesseract language pack.
    pub language: String,
    /// Tesseract page segmentation mode (6 = single uniform block of text).
    pub page_segmentation_mode: u8,
    /// Deadline for one external tool call on one page.
    pub page_timeout_secs: u64,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            dpi: 200,
            language: "spa".into(),
            page_segmentation_mode: 6,
            page_timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for the rotating JSON log file; console only when unset.
    pub file_dir: Option<PathBuf>,
    /// Emit console logs as JSON.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file_dir: None,
            json: false,
        }
    }
}

/// Top-level settings for the redaction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaroConfig {
    pub tools: ToolPaths,
    pub ocr: OcrSettings,
    /// Unicode TrueType font used for the redacted PDF.
    pub font_path: PathBuf,
    /// Root under which one directory per case is created.
    pub cases_root: PathBuf,
    pub paper_size: PaperSize,
    /// Resolution used when encoding pages for the chat model.
    pub preview_dpi: u32,
    pub logging: LoggingConfig,
}

impl Default for FaroConfig {
    fn default() -> Self {
        Self {
            tools: ToolPaths::default(),
            ocr: OcrSettings::default(),
            font_path: PathBuf::from("fonts/NotoSans-Regular.ttf"),
            cases_root: PathBuf::from("cases"),
            paper_size: PaperSize::A4,
            preview_dpi: 72,
            logging: LoggingConfig::default(),
        }
    }
}

impl FaroConfig {
    /// Load from an optional TOML file, apply process environment overrides,
    /// and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    FaroError::Config(format!("cannot read {}: {e}", path.display()))
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        tracing::debug!(
            file = ?path,
            cases_root = %config.cases_root.display(),
            dpi = config.ocr.dpi,
            "Configuration loaded"
        );
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| FaroError::Config(format!("malformed TOML: {e}")))
    }

    /// Apply `FARO_*` overrides read through `lookup`.
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("FARO_PDFTOPPM") {
            self.tools.pdftoppm = PathBuf::from(v);
        }
        if let Some(v) = lookup("FARO_TESSERACT") {
            self.tools.tesseract = PathBuf::from(v);
        }
        if let Some(v) = lookup("FARO_FONT_PATH") {
            self.font_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("FARO_CASES_ROOT") {
            self.cases_root = PathBuf::from(v);
        }
        if let Some(v) = lookup("FARO_OCR_DPI") {
            self.ocr.dpi = parse_number("FARO_OCR_DPI", &v)?;
        }
        if let Some(v) = lookup("FARO_OCR_LANGUAGE") {
            self.ocr.language = v;
        }
        if let Some(v) = lookup("FARO_OCR_PSM") {
            self.ocr.page_segmentation_mode = parse_number("FARO_OCR_PSM", &v)?;
        }
        if let Some(v) = lookup("FARO_PAGE_TIMEOUT_SECS") {
            self.ocr.page_timeout_secs = parse_number("FARO_PAGE_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("FARO_PREVIEW_DPI") {
            self.preview_dpi = parse_number("FARO_PREVIEW_DPI", &v)?;
        }
        if let Some(v) = lookup("FARO_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("FARO_LOG_DIR") {
            self.logging.file_dir = Some(PathBuf::from(v));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(50..=1200).contains(&self.ocr.dpi) {
            return Err(FaroError::Config(format!(
                "ocr.dpi must be between 50 and 1200, got {}",
                self.ocr.dpi
            )));
        }
        if !(10..=600).contains(&self.preview_dpi) {
            return Err(FaroError::Config(format!(
                "preview_dpi must be between 10 and 600, got {}",
                self.preview_dpi
            )));
        }
        if self.ocr.page_segmentation_mode > 13 {
            return Err(FaroError::Config(format!(
                "ocr.page_segmentation_mode must be 0-13, got {}",
                self.ocr.page_segmentation_mode
            )));
        }
        if self.ocr.page_timeout_secs == 0 {
            return Err(FaroError::Config(
                "ocr.page_timeout_secs must be positive".into(),
            ));
        }
        if self.ocr.language.trim().is_empty() {
            return Err(FaroError::Config("ocr.language must not be empty".into()));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| FaroError::Config(format!("{key} is not a valid number: {value:?}")))
}
