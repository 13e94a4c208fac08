// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! brandguard: Brand Compliance Enforcer
//!
//! Decides whether the elements of a visual document follow a brand kit:
//!
//! - Palette (fills drawn from the kit's allowed colors)
//! - Typography (fonts from the kit, with style variants)
//! - Accessibility (WCAG contrast against the effective background)
//!
//! For each violation it picks the best compliant replacement, reports
//! contrast failures no brand color can fix, and applies batch fixes that can
//! be undone in one step.

pub mod audit;
pub mod color;
pub mod config;
pub mod contrast;
pub mod element;
pub mod error;
pub mod kit;
pub mod provider;
pub mod tone;
pub mod undo;

pub use audit::{
    AuditResult, AuditSession, FixPlan, FixReport, FixSuggestionEngine, RuleBreak,
    UnfixableFinding, Violation, ViolationClassifier, ViolationKind,
};
pub use color::{Color, ColorError};
pub use config::Config;
pub use contrast::{contrast, contrast_ratio, ContrastOptions, ContrastReport, WcagLevel};
pub use element::{ElementKind, ScannedElement};
pub use error::{BrandguardError, Result};
pub use kit::{BrandKitStore, BrandKitValidator, BrandSpecification, ValidationReport};
pub use provider::{ApplyFailure, DocumentProvider, JsonDocument, ScanResult};
pub use tone::{GeminiClient, ToneAnalysis, ToneAnalyzer, ToneRequest};
pub use undo::{SnapshotUndoManager, UndoOutcome, UndoState};
