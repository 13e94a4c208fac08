// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Fix suggestions
//!
//! Color selection is two-tiered when contrast fails against a known
//! background:
//! 1. the *safe list*: brand colors, other than the current one, that meet the
//!    requirement. The safe color nearest to the current fill wins.
//! 2. no safe color: the non-current brand color with the highest contrast.
//!
//! Without a contrast failure the nearest brand color wins. Ties always go to
//! the color listed first in the kit.

use super::classifier::{font_matches, required_contrast};
use super::{Violation, ViolationClassifier, ViolationKind};
use crate::color::Color;
use crate::contrast::contrast_ratio;
use crate::element::ScannedElement;
use crate::kit::BrandSpecification;
use serde::{Deserialize, Serialize};

/// A brand color that sits on a background it cannot meet the requirement on,
/// with no brand color that could
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnfixableFinding {
    pub element_id: String,
    pub current_color: Color,
    pub background: Color,
    pub current_ratio: f64,
    pub required_ratio: f64,
    /// Highest ratio any brand color reaches on this background
    pub best_ratio: f64,
    pub best_color: Color,
    pub is_current_best: bool,
}

/// New values to apply to one element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixPlan {
    pub element_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

/// Computes replacements against one captured specification
pub struct FixSuggestionEngine<'a> {
    spec: &'a BrandSpecification,
}

impl<'a> FixSuggestionEngine<'a> {
    pub fn new(spec: &'a BrandSpecification) -> Self {
        Self { spec }
    }

    /// Best brand color for the element's fill, `None` without a fill
    ///
    /// The contrast-driven search only runs when the classifier reports a
    /// contrast break, so an on-brand fill whose failure is suppressed keeps
    /// the nearest-color answer (itself).
    pub fn suggest_color(&self, element: &ScannedElement) -> Option<Color> {
        let current = element.fill?;
        let allowed = self.spec.allowed_colors();

        let (Some(background), Some(_)) = (
            element.background,
            ViolationClassifier::new(self.spec).check_contrast(element),
        ) else {
            return nearest(allowed.iter(), &current);
        };

        let required = required_contrast(self.spec, element);

        let others = || allowed.iter().filter(move |c| **c != current);
        let safe = others().filter(|c| required.is_met_by(contrast_ratio(c, &background)));

        nearest(safe, &current)
            .or_else(|| highest_contrast(others(), &background))
            // every brand color is the current one
            .or_else(|| allowed.first().copied())
    }

    /// First brand font when the element's font is off-brand
    pub fn suggest_font(&self, element: &ScannedElement) -> Option<String> {
        let font = element.font.as_deref()?;
        let allowed = self.spec.allowed_fonts();
        if allowed.iter().any(|a| font_matches(font, a)) {
            return None;
        }
        allowed.first().cloned()
    }

    /// Brand-colored elements failing contrast where no brand color can pass
    pub fn find_unfixable(&self, elements: &[ScannedElement]) -> Vec<UnfixableFinding> {
        elements.iter().filter_map(|e| self.unfixable(e)).collect()
    }

    fn unfixable(&self, element: &ScannedElement) -> Option<UnfixableFinding> {
        let current = element.fill?;
        let background = element.background?;
        if !self.spec.allows_color(&current) {
            return None;
        }

        let required = required_contrast(self.spec, element);
        let current_ratio = contrast_ratio(&current, &background);
        if required.is_met_by(current_ratio) {
            return None;
        }

        // the current color wins ties so an optimal fill reports itself
        let (best_color, best_ratio) = self.spec.allowed_colors().iter().fold(
            (current, current_ratio),
            |(best, best_ratio), c| {
                let ratio = contrast_ratio(c, &background);
                if ratio > best_ratio {
                    (*c, ratio)
                } else {
                    (best, best_ratio)
                }
            },
        );

        if required.is_met_by(best_ratio) {
            return None;
        }

        Some(UnfixableFinding {
            element_id: element.id.clone(),
            current_color: current,
            background,
            current_ratio,
            required_ratio: required.ratio,
            best_ratio,
            best_color,
            is_current_best: best_color == current,
        })
    }

    /// Values that would resolve a violation, `None` if nothing would change
    pub fn plan_fix(&self, element: &ScannedElement, violation: &Violation) -> Option<FixPlan> {
        let needs_color =
            violation.breaks(ViolationKind::Color) || violation.breaks(ViolationKind::Contrast);
        let color = if needs_color {
            self.suggest_color(element).filter(|c| Some(*c) != element.fill)
        } else {
            None
        };

        let font = if violation.breaks(ViolationKind::Font) {
            self.suggest_font(element)
        } else {
            None
        };

        if color.is_none() && font.is_none() {
            return None;
        }

        Some(FixPlan {
            element_id: element.id.clone(),
            color,
            font,
        })
    }
}

/// Nearest candidate by RGB distance, first wins ties
fn nearest<'c>(candidates: impl Iterator<Item = &'c Color>, target: &Color) -> Option<Color> {
    let mut best: Option<(Color, f64)> = None;
    for c in candidates {
        let d = c.distance(target);
        if best.map_or(true, |(_, bd)| d < bd) {
            best = Some((*c, d));
        }
    }
    best.map(|(c, _)| c)
}

/// Candidate with the highest contrast on `background`, first wins ties
fn highest_contrast<'c>(candidates: impl Iterator<Item = &'c Color>, background: &Color) -> Option<Color> {
    let mut best: Option<(Color, f64)> = None;
    for c in candidates {
        let r = contrast_ratio(c, background);
        if best.map_or(true, |(_, br)| r > br) {
            best = Some((*c, r));
        }
    }
    best.map(|(c, _)| c)
}
