// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Batch undo
//!
//! [`SnapshotUndoManager`] keeps at most one snapshot: the pre-fix state of
//! the last batch that changed something. A batch with nothing to fix leaves
//! the snapshot alone, and a batch whose every change was refused is
//! abandoned, putting back the snapshot it displaced.

use crate::color::Color;
use crate::element::ScannedElement;
use crate::provider::{try_apply_color, try_apply_font, ApplyFailure, DocumentProvider};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

/// Pre-fix state of one element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub element_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

impl From<&ScannedElement> for SnapshotEntry {
    fn from(element: &ScannedElement) -> Self {
        Self {
            element_id: element.id.clone(),
            color: element.fill,
            font: element.font.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: Uuid,
    pub captured_at: DateTime<Utc>,
    /// In capture order, restored in the same order
    pub entries: Vec<SnapshotEntry>,
}

impl Snapshot {
    pub fn capture(elements: &[ScannedElement]) -> Self {
        Self {
            id: Uuid::new_v4(),
            captured_at: Utc::now(),
            entries: elements.iter().map(SnapshotEntry::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoState {
    Idle,
    Armed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// A new snapshot replaced whatever was there
    Captured { entries: usize },
    /// Nothing to fix, state untouched
    Unchanged,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UndoOutcome {
    NothingToUndo,
    Restored {
        restored: usize,
        failures: Vec<ApplyFailure>,
    },
}

#[derive(Debug, Default)]
pub struct SnapshotUndoManager {
    snapshot: Option<Snapshot>,
    /// `Some` while a captured batch is open: what it replaced
    displaced: Option<Option<Snapshot>>,
}

impl SnapshotUndoManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume with a previously persisted snapshot
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            displaced: None,
        }
    }

    pub fn state(&self) -> UndoState {
        if self.snapshot.is_some() {
            UndoState::Armed
        } else {
            UndoState::Idle
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Record the state of the elements about to be fixed
    ///
    /// A captured batch stays open until [`commit_batch`](Self::commit_batch)
    /// or [`abandon_batch`](Self::abandon_batch).
    pub fn begin_batch(&mut self, elements: &[ScannedElement]) -> BatchOutcome {
        self.displaced = None;
        if elements.is_empty() {
            return BatchOutcome::Unchanged;
        }

        let snapshot = Snapshot::capture(elements);
        info!(snapshot = %snapshot.id, entries = snapshot.entries.len(), "Captured undo snapshot");
        let entries = snapshot.entries.len();
        self.displaced = Some(self.snapshot.replace(snapshot));
        BatchOutcome::Captured { entries }
    }

    /// Keep the open batch's snapshot
    pub fn commit_batch(&mut self) {
        self.displaced = None;
    }

    /// Drop the open batch's snapshot and reinstate the one it replaced
    ///
    /// Returns `false` when no batch is open.
    pub fn abandon_batch(&mut self) -> bool {
        match self.displaced.take() {
            Some(previous) => {
                info!(
                    restored = ?previous.as_ref().map(|s| s.id),
                    "Abandoned batch, previous snapshot reinstated"
                );
                self.snapshot = previous;
                true
            }
            None => false,
        }
    }

    /// Re-apply the snapshot through the provider and return to idle
    pub async fn undo(&mut self, provider: &dyn DocumentProvider) -> UndoOutcome {
        self.displaced = None;
        let Some(snapshot) = self.snapshot.take() else {
            warn!("Undo requested with no snapshot");
            return UndoOutcome::NothingToUndo;
        };

        let mut failures = Vec::new();
        let mut restored = 0;

        for entry in &snapshot.entries {
            let mut ok = true;
            // absent values were never changed by a fix, nothing to put back
            if let Some(color) = entry.color {
                if let Some(failure) = try_apply_color(provider, &entry.element_id, color).await {
                    failures.push(failure);
                    ok = false;
                }
            }
            if let Some(font) = entry.font.as_deref() {
                if let Some(failure) = try_apply_font(provider, &entry.element_id, font).await {
                    failures.push(failure);
                    ok = false;
                }
            }
            if ok {
                restored += 1;
            }
        }

        info!(snapshot = %snapshot.id, restored, failed = failures.len(), "Undo complete");
        UndoOutcome::Restored { restored, failures }
    }
}
