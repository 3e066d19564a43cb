// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page image normalization: grayscale conversion and global Otsu
// binarization ahead of OCR.

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use imageproc::contrast::otsu_level;
use faro_core::error::{FaroError, Result};
use tracing::{debug, instrument};

/// Image processing pipeline operating on a single rendered page.
///
/// Each step consumes `self` and returns a new processor, so the OCR
/// preparation reads as a chain:
///
/// ```ignore
/// let binary = ImageProcessor::from_bytes(&png)?
///     .grayscale()
///     .binarize_otsu()
///     .into_luma();
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Decode a raster from encoded bytes (PNG, JPEG, PPM, ...).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)
            .map_err(|err| FaroError::Image(format!("failed to decode page image: {err}")))?;
        if img.width() == 0 || img.height() == 0 {
            return Err(FaroError::Image("page image has no pixels".into()));
        }
        debug!(width = img.width(), height = img.height(), "Page image decoded");
        Ok(Self { image: img })
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Consume the processor and return an 8-bit luma buffer.
    pub fn into_luma(self) -> GrayImage {
        match self.image {
            DynamicImage::ImageLuma8(gray) => gray,
            other => other.to_luma8(),
        }
    }

    // -- Transformations ------------------------------------------------------

    /// Collapse to 8-bit grayscale regardless of input colour depth.
    pub fn grayscale(self) -> Self {
        Self {
            image: DynamicImage::ImageLuma8(self.image.to_luma8()),
        }
    }

    /// Global Otsu binarization: pixels strictly above the computed level
    /// become white, everything else black.
    #[instrument(skip(self))]
    pub fn binarize_otsu(self) -> Self {
        let gray = self.into_luma();
        let level = otsu_level(&gray);
        debug!(level, "Otsu level computed");

        let binary = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
            if gray.get_pixel(x, y).0[0] > level {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        Self {
            image: DynamicImage::ImageLuma8(binary),
        }
    }
}

/// Decode a rendered page and prepare it for OCR.
pub fn normalize_page(encoded: &[u8]) -> Result<GrayImage> {
    Ok(ImageProcessor::from_bytes(encoded)?
        .grayscale()
        .binarize_otsu()
        .into_luma())
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| FaroError::Image(format!("PNG encoding failed: {err}")))?;
    Ok(buffer)
}
