// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Violation classification
//!
//! Three independent checks per element:
//! - palette: the fill must be one of the brand colors
//! - contrast: fill against the effective background, see [`RequiredContrast`]
//! - font: a brand font, or a brand font with a style suffix (`Inter-Bold`)
//!
//! A fill that is already a brand color but fails contrast is only flagged if
//! another brand color would do better, either by meeting the requirement or
//! by gaining at least [`MATERIAL_GAIN`] on the ratio.

use super::{RuleBreak, Violation};
use crate::color::Color;
use crate::contrast::{contrast_ratio, RequiredContrast};
use crate::element::ScannedElement;
use crate::kit::BrandSpecification;

/// Ratio improvement that makes switching brand colors worthwhile
pub const MATERIAL_GAIN: f64 = 0.5;

const FONT_SEPARATORS: [char; 3] = [' ', '-', '_'];

/// Style words accepted after a brand font name
const STYLE_WORDS: &[&str] = &[
    "extrabold", "extralight", "ultrabold", "ultralight", "semibold", "demibold",
    "condensed", "expanded", "hairline", "oblique", "regular", "italic", "medium",
    "narrow", "normal", "black", "heavy", "light", "roman", "thin", "bold", "book",
    "demi", "wide",
];

/// Checks elements against one captured specification
pub struct ViolationClassifier<'a> {
    spec: &'a BrandSpecification,
}

impl<'a> ViolationClassifier<'a> {
    pub fn new(spec: &'a BrandSpecification) -> Self {
        Self { spec }
    }

    /// All rules the element breaks, `None` when compliant
    pub fn classify(&self, element: &ScannedElement) -> Option<Violation> {
        let rules: Vec<RuleBreak> = [
            self.check_palette(element),
            self.check_contrast(element),
            self.check_font(element),
        ]
        .into_iter()
        .flatten()
        .collect();

        Violation::from_rules(&element.id, rules)
    }

    /// Classify every element, keeping only the violating ones
    pub fn classify_all(&self, elements: &[ScannedElement]) -> Vec<Violation> {
        elements.iter().filter_map(|e| self.classify(e)).collect()
    }

    pub fn check_palette(&self, element: &ScannedElement) -> Option<RuleBreak> {
        let fill = element.fill?;
        (!self.spec.allows_color(&fill)).then_some(RuleBreak::Palette { color: fill })
    }

    pub fn check_contrast(&self, element: &ScannedElement) -> Option<RuleBreak> {
        let fill = element.fill?;
        let background = element.background?;
        let required = required_contrast(self.spec, element);
        let ratio = contrast_ratio(&fill, &background);

        if required.is_met_by(ratio) {
            return None;
        }

        let on_brand = self.spec.allows_color(&fill);
        if on_brand && !self.has_better_brand_color(fill, background, ratio, required) {
            return None;
        }

        Some(RuleBreak::Contrast {
            color: fill,
            background,
            ratio,
            required: required.ratio,
            level: required.level,
        })
    }

    pub fn check_font(&self, element: &ScannedElement) -> Option<RuleBreak> {
        let font = element.font.as_deref()?;
        if self.spec.allowed_fonts().iter().any(|allowed| font_matches(font, allowed)) {
            None
        } else {
            Some(RuleBreak::Font {
                font: font.to_string(),
            })
        }
    }

    fn has_better_brand_color(
        &self,
        current: Color,
        background: Color,
        current_ratio: f64,
        required: RequiredContrast,
    ) -> bool {
        self.spec
            .allowed_colors()
            .iter()
            .filter(|c| **c != current)
            .map(|c| contrast_ratio(c, &background))
            .any(|r| required.is_met_by(r) || r >= current_ratio + MATERIAL_GAIN)
    }
}

/// The contrast requirement for an element under a specification
pub fn required_contrast(spec: &BrandSpecification, element: &ScannedElement) -> RequiredContrast {
    RequiredContrast::for_element(spec.min_contrast(), element.kind.is_text())
}

/// Whether `font` is `allowed`, or `allowed` plus a separator and style words
pub fn font_matches(font: &str, allowed: &str) -> bool {
    let font = font.trim().to_lowercase();
    let allowed = allowed.trim().to_lowercase();

    if font == allowed {
        return true;
    }

    let Some(rest) = font.strip_prefix(allowed.as_str()) else {
        return false;
    };
    let Some(suffix) = rest.strip_prefix(FONT_SEPARATORS) else {
        return false;
    };

    !suffix.is_empty()
        && suffix
            .split(FONT_SEPARATORS)
            .all(|part| !part.is_empty() && is_style_run(part))
}

/// `part` is one or more style words run together ("bolditalic")
fn is_style_run(part: &str) -> bool {
    part.is_empty()
        || STYLE_WORDS.iter().any(|word| {
            part.strip_prefix(*word)
                .map(is_style_run)
                .unwrap_or(false)
        })
}
