// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Audit sessions
//!
//! One pass = one scan against one captured specification. The active kit is
//! read from the store exactly once per pass; a kit swapped in mid-pass only
//! affects the next one.

use super::{health_score, AuditResult, FixPlan, FixSuggestionEngine, ViolationClassifier};
use crate::element::ScannedElement;
use crate::error::Result;
use crate::kit::{BrandKitStore, BrandSpecification};
use crate::provider::{try_apply_color, try_apply_font, ApplyFailure, DocumentProvider};
use crate::undo::{BatchOutcome, SnapshotUndoManager};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of a batch fix
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixReport {
    /// Fixes that were planned, in document order
    pub plans: Vec<FixPlan>,
    /// Elements whose every planned change was applied
    pub fixed: usize,
    pub failures: Vec<ApplyFailure>,
    /// Whether this batch replaced the undo snapshot, which requires at
    /// least one applied change
    pub snapshot_taken: bool,
}

impl FixReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct AuditSession {
    store: Arc<BrandKitStore>,
}

impl AuditSession {
    pub fn new(store: Arc<BrandKitStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<BrandKitStore> {
        &self.store
    }

    /// Audit the document against the active kit
    pub async fn run(&self, provider: &dyn DocumentProvider) -> Result<AuditResult> {
        let spec = self.store.require_active()?;
        run_with(&spec, provider).await
    }

    /// Fix every violation against the active kit
    ///
    /// The undo manager is armed with the pre-fix state of the elements that
    /// will actually change. Provider refusals are collected, never fatal; if
    /// every change is refused the previous snapshot stays live.
    pub async fn fix_all(
        &self,
        provider: &dyn DocumentProvider,
        undo: &mut SnapshotUndoManager,
    ) -> Result<FixReport> {
        let spec = self.store.require_active()?;
        let elements = provider.scan().await?.elements;
        let plans = plan_fixes(&spec, &elements);

        let by_id: HashMap<&str, &ScannedElement> =
            elements.iter().map(|e| (e.id.as_str(), e)).collect();
        let batch: Vec<ScannedElement> = plans
            .iter()
            .filter_map(|p| by_id.get(p.element_id.as_str()).map(|e| (*e).clone()))
            .collect();

        let captured = matches!(undo.begin_batch(&batch), BatchOutcome::Captured { .. });

        let mut failures = Vec::new();
        let mut fixed = 0;
        let mut applied = 0;
        for plan in &plans {
            let mut clean = true;
            if let Some(color) = plan.color {
                match try_apply_color(provider, &plan.element_id, color).await {
                    Some(failure) => {
                        failures.push(failure);
                        clean = false;
                    }
                    None => applied += 1,
                }
            }
            if let Some(font) = plan.font.as_deref() {
                match try_apply_font(provider, &plan.element_id, font).await {
                    Some(failure) => {
                        failures.push(failure);
                        clean = false;
                    }
                    None => applied += 1,
                }
            }
            if clean {
                fixed += 1;
            }
        }

        // a batch the provider refused entirely changed nothing worth undoing
        let snapshot_taken = captured && applied > 0;
        if snapshot_taken {
            undo.commit_batch();
        } else if captured {
            undo.abandon_batch();
            debug!(planned = plans.len(), "No change applied, undo snapshot kept");
        }

        info!(
            kit = %spec.name(),
            planned = plans.len(),
            fixed,
            failed = failures.len(),
            "Batch fix complete"
        );

        Ok(FixReport {
            plans,
            fixed,
            failures,
            snapshot_taken,
        })
    }
}

/// Audit the document against an explicit specification
pub async fn run_with(
    spec: &BrandSpecification,
    provider: &dyn DocumentProvider,
) -> Result<AuditResult> {
    let scan = provider.scan().await?;
    let result = audit_elements(spec, &scan.elements);
    info!(
        kit = %spec.name(),
        elements = result.total_elements,
        violations = result.violations.len(),
        unfixable = result.unfixable.len(),
        health = result.health_score,
        "Audit complete"
    );
    Ok(result)
}

/// Classify already-scanned elements
pub fn audit_elements(spec: &BrandSpecification, elements: &[ScannedElement]) -> AuditResult {
    let violations = ViolationClassifier::new(spec).classify_all(elements);
    let unfixable = FixSuggestionEngine::new(spec).find_unfixable(elements);
    let health_score = health_score(elements.len(), violations.len());

    AuditResult {
        kit: spec.name().to_string(),
        total_elements: elements.len(),
        violations,
        unfixable,
        health_score,
    }
}

/// Fixes for every violating element, skipping ones with nothing to change
pub fn plan_fixes(spec: &BrandSpecification, elements: &[ScannedElement]) -> Vec<FixPlan> {
    let classifier = ViolationClassifier::new(spec);
    let engine = FixSuggestionEngine::new(spec);

    elements
        .iter()
        .filter_map(|element| {
            let violation = classifier.classify(element)?;
            let plan = engine.plan_fix(element, &violation);
            if plan.is_none() {
                debug!(element = %element.id, primary = ?violation.primary, "No fix available");
            }
            plan
        })
        .collect()
}
