// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for page normalization and text layout in the
// faro-document crate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};

use faro_document::{ImageProcessor, PageLayout};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Grayscale + Otsu on a synthetic A4 page rendered at 200 DPI (1654x2339).
///
/// Horizontal dark stripes every 40 rows stand in for lines of text.
fn bench_normalize_page(c: &mut Criterion) {
    let (width, height) = (1654u32, 2339u32);
    let img = RgbImage::from_fn(width, height, |x, y| {
        if y % 40 < 12 && x % 9 < 6 {
            Rgb([35, 30, 40])
        } else {
            Rgb([235, 232, 228])
        }
    });
    let dynamic = DynamicImage::ImageRgb8(img);

    c.bench_function("normalize_page (A4 @ 200 DPI)", |b| {
        b.iter(|| {
            let binary = ImageProcessor::from_dynamic(black_box(dynamic.clone()))
                .grayscale()
                .binarize_otsu()
                .into_luma();
            black_box(binary);
        });
    });
}

/// Wrapping and pagination of a ten-page letter.
fn bench_paginate(c: &mut Criterion) {
    let paragraph = "Yo, [NOMBRE], identificada con [CÉDULA], solicito la devolucion \
                     de los valores debitados de mi cuenta [CUENTA] sin autorizacion.\n";
    let text = paragraph.repeat(300);
    let layout = PageLayout::default();

    c.bench_function("paginate (300 paragraphs)", |b| {
        b.iter(|| black_box(layout.paginate(black_box(&text))));
    });
}

criterion_group!(benches, bench_normalize_page, bench_paginate);
criterion_main!(benches);
