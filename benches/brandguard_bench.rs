// SPDX-License-Identifier: PMPL-1.0-or-later
//! Benchmarks for brandguard auditing

use brandguard::audit::{self, FixSuggestionEngine, ViolationClassifier};
use brandguard::{BrandKitValidator, BrandSpecification, Color, ElementKind, ScannedElement};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

fn brand_kit() -> serde_json::Value {
    json!({
        "name": "Bench",
        "allowedColors": ["#1A1A1A", "#FFFFFF", "#C9A227", "#F4EFE6", "#2B4C7E", "#8C1C13", "#E6E6E6", "#5C5C5C"],
        "allowedFonts": ["Playfair Display", "Inter", "Montserrat"],
        "accessibility": { "minContrast": 4.5 }
    })
}

fn spec() -> BrandSpecification {
    BrandKitValidator::default()
        .normalize(&brand_kit())
        .unwrap_or_else(|report| panic!("invalid bench kit: {:?}", report))
}

/// A thousand elements spread over the RGB cube, mixed text and shapes
fn elements() -> Vec<ScannedElement> {
    let fonts = ["Inter-Bold", "Arial", "Playfair Display Italic", "Comic Sans MS"];
    (0..1000u32)
        .map(|i| {
            let fill = Color::rgb((i * 37 % 256) as u8, (i * 91 % 256) as u8, (i * 53 % 256) as u8);
            let kind = if i % 2 == 0 { ElementKind::Text } else { ElementKind::Shape };
            ScannedElement::new(&format!("el{}", i), kind)
                .with_fill(fill)
                .with_background(Color::rgb(0xF4, 0xEF, 0xE6))
                .with_font(fonts[i as usize % fonts.len()])
        })
        .collect()
}

fn bench_validate_kit(c: &mut Criterion) {
    let validator = BrandKitValidator::default();
    let kit = brand_kit();

    c.bench_function("validate_kit", |b| b.iter(|| validator.validate(black_box(&kit))));
}

fn bench_classify(c: &mut Criterion) {
    let spec = spec();
    let elements = elements();
    let classifier = ViolationClassifier::new(&spec);

    c.bench_function("classify_1000", |b| {
        b.iter(|| classifier.classify_all(black_box(&elements)))
    });
}

fn bench_suggest(c: &mut Criterion) {
    let spec = spec();
    let elements = elements();
    let engine = FixSuggestionEngine::new(&spec);

    c.bench_function("suggest_color_1000", |b| {
        b.iter(|| {
            elements
                .iter()
                .filter_map(|e| engine.suggest_color(black_box(e)))
                .count()
        })
    });
}

fn bench_audit(c: &mut Criterion) {
    let spec = spec();
    let elements = elements();

    c.bench_function("audit_1000", |b| {
        b.iter(|| audit::audit_elements(black_box(&spec), black_box(&elements)))
    });
}

criterion_group!(
    benches,
    bench_validate_kit,
    bench_classify,
    bench_suggest,
    bench_audit
);
criterion_main!(benches);
