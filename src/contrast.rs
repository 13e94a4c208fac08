// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Contrast ratio measurement - WCAG 1.4.3 / 1.4.6 / 1.4.11
//!
//! - AA: 4.5:1 for normal text, 3:1 for large text and non-text
//! - AAA: 7:1 for normal text, 4.5:1 for large text and non-text
//!
//! The engine only measures. Which threshold a rule check enforces is chosen
//! by [`RequiredContrast::for_element`] from the brand's `minContrast`.

use crate::color::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const AA_NORMAL: f64 = 4.5;
pub const AA_LARGE: f64 = 3.0;
pub const AAA_NORMAL: f64 = 7.0;
pub const AAA_LARGE: f64 = 4.5;

/// WCAG conformance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WcagLevel {
    /// Level AA - standard conformance
    AA,
    /// Level AAA - enhanced conformance
    AAA,
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WcagLevel::AA => write!(f, "AA"),
            WcagLevel::AAA => write!(f, "AAA"),
        }
    }
}

/// Options for a single contrast measurement
#[derive(Debug, Clone, Copy, Default)]
pub struct ContrastOptions {
    /// Large text or non-text content (relaxed thresholds)
    pub large_or_non_text: bool,
    /// Also compute the AAA measurement
    pub include_aaa: bool,
}

/// Result of measuring one foreground/background pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastReport {
    pub ratio: f64,
    pub passes_aa: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passes_aaa: Option<bool>,
    pub required_aa: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_aaa: Option<f64>,
}

/// Contrast ratio between two colors, in `[1, 21]`
pub fn contrast_ratio(fg: &Color, bg: &Color) -> f64 {
    let l1 = fg.luminance();
    let l2 = bg.luminance();
    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Measure a color pair against the AA (and optionally AAA) thresholds
pub fn contrast(fg: &Color, bg: &Color, options: ContrastOptions) -> ContrastReport {
    let ratio = contrast_ratio(fg, bg);
    let (required_aa, aaa) = if options.large_or_non_text {
        (AA_LARGE, AAA_LARGE)
    } else {
        (AA_NORMAL, AAA_NORMAL)
    };
    let required_aaa = options.include_aaa.then_some(aaa);

    ContrastReport {
        ratio,
        passes_aa: ratio >= required_aa,
        passes_aaa: required_aaa.map(|req| ratio >= req),
        required_aa,
        required_aaa,
    }
}

/// The ratio a rule check enforces for one element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequiredContrast {
    pub level: WcagLevel,
    pub ratio: f64,
}

impl RequiredContrast {
    /// Select the enforced ratio for an element.
    ///
    /// A `min_contrast` of 7.0 or more switches to AAA semantics. Text elements
    /// get the large-text floor of that level, never above `min_contrast`;
    /// every other kind is held to `min_contrast` itself.
    pub fn for_element(min_contrast: f64, is_text: bool) -> Self {
        let level = if min_contrast >= AAA_NORMAL {
            WcagLevel::AAA
        } else {
            WcagLevel::AA
        };

        let ratio = if is_text {
            let floor = match level {
                WcagLevel::AAA => AAA_LARGE,
                WcagLevel::AA => AA_LARGE,
            };
            floor.min(min_contrast)
        } else {
            min_contrast
        };

        Self { level, ratio }
    }

    pub fn is_met_by(&self, ratio: f64) -> bool {
        ratio >= self.ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> Color {
        Color::normalize(s).unwrap()
    }

    #[test]
    fn test_black_on_white_is_21() {
        let report = contrast(&Color::BLACK, &Color::WHITE, ContrastOptions::default());
        assert!((report.ratio - 21.0).abs() < 1e-6);
        assert!(report.passes_aa);

        let large = contrast(
            &Color::BLACK,
            &Color::WHITE,
            ContrastOptions { large_or_non_text: true, include_aaa: false },
        );
        assert!(large.passes_aa);
    }

    #[test]
    fn test_same_color_is_one() {
        for c in ["#000000", "#777777", "#FFFFFF", "#12AB34"] {
            let color = hex(c);
            assert!((contrast_ratio(&color, &color) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_grey_on_grey_fails_aa() {
        let grey = hex("#777777");
        let report = contrast(&grey, &grey, ContrastOptions::default());
        assert!(!report.passes_aa);
        assert_eq!(report.required_aa, 4.5);
    }

    #[test]
    fn test_ratio_is_symmetric() {
        let a = hex("#336699");
        let b = hex("#F0E68C");
        assert_eq!(contrast_ratio(&a, &b), contrast_ratio(&b, &a));
    }

    #[test]
    fn test_aaa_only_when_requested() {
        let fg = hex("#595959");
        let without = contrast(&fg, &Color::WHITE, ContrastOptions::default());
        assert_eq!(without.passes_aaa, None);
        assert_eq!(without.required_aaa, None);

        let with = contrast(
            &fg,
            &Color::WHITE,
            ContrastOptions { large_or_non_text: false, include_aaa: true },
        );
        // #595959 on white is ~7.0:1
        assert_eq!(with.required_aaa, Some(7.0));
        assert!(with.passes_aa);
    }

    #[test]
    fn test_large_thresholds() {
        let report = contrast(
            &hex("#808080"),
            &Color::WHITE,
            ContrastOptions { large_or_non_text: true, include_aaa: true },
        );
        assert_eq!(report.required_aa, 3.0);
        assert_eq!(report.required_aaa, Some(4.5));
        // #808080 on white is ~3.6:1
        assert!(report.passes_aa);
        assert_eq!(report.passes_aaa, Some(false));
    }

    #[test]
    fn test_required_contrast_selection() {
        let aa_shape = RequiredContrast::for_element(4.5, false);
        assert_eq!(aa_shape.level, WcagLevel::AA);
        assert_eq!(aa_shape.ratio, 4.5);

        let aa_text = RequiredContrast::for_element(4.5, true);
        assert_eq!(aa_text.ratio, 3.0);

        let aaa_text = RequiredContrast::for_element(7.0, true);
        assert_eq!(aaa_text.level, WcagLevel::AAA);
        assert_eq!(aaa_text.ratio, 4.5);

        let aaa_shape = RequiredContrast::for_element(7.5, false);
        assert_eq!(aaa_shape.ratio, 7.5);

        // a lax brand never gets a stricter floor than it asked for
        let lax_text = RequiredContrast::for_element(2.0, true);
        assert_eq!(lax_text.ratio, 2.0);
    }
}
