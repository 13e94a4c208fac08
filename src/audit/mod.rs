// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Brand compliance auditing
//!
//! - [`classifier`]: which rules an element breaks
//! - [`suggest`]: the best compliant replacement, and whether one exists
//! - [`session`]: full-document passes and batch fixes

pub mod classifier;
pub mod session;
pub mod suggest;

use crate::color::Color;
use crate::contrast::WcagLevel;
use serde::{Deserialize, Serialize};

pub use classifier::ViolationClassifier;
pub use session::{audit_elements, plan_fixes, run_with, AuditSession, FixReport};
pub use suggest::{FixPlan, FixSuggestionEngine, UnfixableFinding};

/// Violation kinds, in priority order (highest first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationKind {
    /// Fails the contrast requirement against its background
    Contrast,
    /// Font is not one of the brand fonts
    Font,
    /// Fill is not in the brand palette
    Color,
}

/// One broken rule, with the values that broke it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum RuleBreak {
    Palette {
        color: Color,
    },
    Font {
        font: String,
    },
    #[serde(rename_all = "camelCase")]
    Contrast {
        color: Color,
        background: Color,
        ratio: f64,
        required: f64,
        level: WcagLevel,
    },
}

impl RuleBreak {
    pub fn kind(&self) -> ViolationKind {
        match self {
            RuleBreak::Palette { .. } => ViolationKind::Color,
            RuleBreak::Font { .. } => ViolationKind::Font,
            RuleBreak::Contrast { .. } => ViolationKind::Contrast,
        }
    }
}

/// An element that breaks at least one rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub element_id: String,
    /// Highest-priority kind among `rules`
    pub primary: ViolationKind,
    /// Every rule the element breaks
    pub rules: Vec<RuleBreak>,
}

impl Violation {
    /// Build a violation from the broken rules, `None` when there are none
    pub fn from_rules(element_id: &str, rules: Vec<RuleBreak>) -> Option<Self> {
        let primary = rules.iter().map(RuleBreak::kind).min()?;
        Some(Self {
            element_id: element_id.to_string(),
            primary,
            rules,
        })
    }

    pub fn breaks(&self, kind: ViolationKind) -> bool {
        self.rules.iter().any(|r| r.kind() == kind)
    }
}

/// Result of one audit pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    /// Name of the kit the pass ran against
    pub kit: String,
    pub total_elements: usize,
    pub violations: Vec<Violation>,
    pub unfixable: Vec<UnfixableFinding>,
    /// 0-100, share of compliant elements
    pub health_score: u8,
}

impl AuditResult {
    pub fn is_compliant(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations_of(&self, kind: ViolationKind) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.primary == kind).collect()
    }

    pub fn violation_for(&self, element_id: &str) -> Option<&Violation> {
        self.violations.iter().find(|v| v.element_id == element_id)
    }
}

/// `round(compliant / total * 100)`, 100 for an empty document
pub fn health_score(total: usize, violating: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let compliant = total.saturating_sub(violating) as f64;
    (compliant / total as f64 * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_score() {
        assert_eq!(health_score(10, 3), 70);
        assert_eq!(health_score(0, 0), 100);
        assert_eq!(health_score(3, 1), 67);
        assert_eq!(health_score(3, 3), 0);
        assert_eq!(health_score(8, 1), 88);
    }

    #[test]
    fn test_primary_follows_priority() {
        let palette = RuleBreak::Palette { color: Color::WHITE };
        let font = RuleBreak::Font { font: "Comic Sans MS".to_string() };
        let contrast = RuleBreak::Contrast {
            color: Color::WHITE,
            background: Color::WHITE,
            ratio: 1.0,
            required: 4.5,
            level: WcagLevel::AA,
        };

        let v = Violation::from_rules("a", vec![palette.clone(), font.clone(), contrast]).unwrap();
        assert_eq!(v.primary, ViolationKind::Contrast);
        assert_eq!(v.rules.len(), 3);

        let v = Violation::from_rules("b", vec![palette.clone(), font]).unwrap();
        assert_eq!(v.primary, ViolationKind::Font);
        assert!(v.breaks(ViolationKind::Color));

        let v = Violation::from_rules("c", vec![palette]).unwrap();
        assert_eq!(v.primary, ViolationKind::Color);

        assert!(Violation::from_rules("d", Vec::new()).is_none());
    }

    #[test]
    fn test_rule_break_serialization() {
        let json = serde_json::to_value(RuleBreak::Palette { color: Color::BLACK }).unwrap();
        assert_eq!(json, serde_json::json!({ "rule": "palette", "color": "#000000" }));
    }
}
