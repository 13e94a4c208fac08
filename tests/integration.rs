// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Integration tests for brandguard: kit import, audit, fix and undo over
//! file-backed documents

use brandguard::kit::{BrandKitStore, FileStore};
use brandguard::provider::{DocumentNode, DocumentProvider};
use brandguard::undo::{SnapshotUndoManager, UndoOutcome, UndoState};
use brandguard::{
    AuditSession, BrandKitValidator, BrandguardError, Color, Config, JsonDocument, ViolationKind,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn maison_kit() -> serde_json::Value {
    json!({
        "name": "Maison",
        "allowedColors": ["#1A1A1A", "#FFFFFF", "#C9A227", "#F4EFE6"],
        "allowedFonts": ["Playfair Display", "Inter"],
        "accessibility": { "minContrast": 4.5 },
        "typography": { "heading": "Playfair Display" }
    })
}

fn hex(s: &str) -> Color {
    s.parse().unwrap()
}

/// Ten elements on a cream page: seven compliant, three violating
fn write_poster(dir: &Path) -> PathBuf {
    let poster = json!({ "elements": [
        { "id": "page", "kind": "shape", "fill": "#F4EFE6" },
        { "id": "header", "kind": "shape", "fill": "#1A1A1A", "parent": "page" },
        { "id": "title", "kind": "text", "fill": "#FFFFFF", "font": "Playfair Display Bold", "parent": "header" },
        { "id": "subtitle", "kind": "text", "fill": "#C9A227", "font": "Inter", "parent": "header" },
        { "id": "body", "kind": "text", "fill": "#1A1A1A", "font": "Inter-Light", "parent": "page" },
        { "id": "rule", "kind": "shape", "fill": "#1A1A1A", "parent": "page" },
        { "id": "logo", "kind": "image", "parent": "page" },
        { "id": "price", "kind": "text", "fill": "#3A1010", "font": "Inter", "parent": "page" },
        { "id": "cta", "kind": "text", "fill": "#1A1A1A", "font": "Comic Sans MS", "parent": "page" },
        { "id": "fineprint", "kind": "text", "fill": "#DDDDDD", "font": "Inter", "parent": "page", "locked": true }
    ] });

    let path = dir.join("poster.json");
    std::fs::write(&path, serde_json::to_string_pretty(&poster).unwrap()).unwrap();
    path
}

fn session() -> AuditSession {
    let store = BrandKitStore::in_memory();
    store.import(&maison_kit()).unwrap();
    AuditSession::new(Arc::new(store))
}

#[tokio::test]
async fn test_audit_poster() {
    let dir = TempDir::new().unwrap();
    let doc = JsonDocument::load(&write_poster(dir.path())).unwrap();

    let result = session().run(&doc).await.unwrap();

    assert_eq!(result.total_elements, 10);
    assert_eq!(result.violations.len(), 3);
    assert_eq!(result.health_score, 70);

    let price = result.violation_for("price").unwrap();
    assert_eq!(price.primary, ViolationKind::Color);

    let cta = result.violation_for("cta").unwrap();
    assert_eq!(cta.primary, ViolationKind::Font);

    // #DDDDDD on cream fails even the large-text floor
    let fineprint = result.violation_for("fineprint").unwrap();
    assert_eq!(fineprint.primary, ViolationKind::Contrast);
    assert!(fineprint.breaks(ViolationKind::Color));
}

#[tokio::test]
async fn test_fix_save_reload_and_undo() {
    let dir = TempDir::new().unwrap();
    let path = write_poster(dir.path());
    let original = std::fs::read_to_string(&path).unwrap();

    let session = session();
    let doc = JsonDocument::load(&path).unwrap();
    let mut undo = SnapshotUndoManager::new();

    let report = session.fix_all(&doc, &mut undo).await.unwrap();
    assert_eq!(report.plans.len(), 3);
    assert_eq!(report.fixed, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].element_id, "fineprint");
    doc.save().unwrap();

    // a fresh load sees the fixes
    let reloaded = JsonDocument::load(&path).unwrap();
    assert_eq!(reloaded.node("cta").unwrap().font.as_deref(), Some("Playfair Display"));
    assert_eq!(reloaded.node("price").unwrap().fill, Some(hex("#1A1A1A")));

    let after = session.run(&reloaded).await.unwrap();
    assert_eq!(after.violations.len(), 1);
    assert_eq!(after.health_score, 90);

    // the snapshot survives a round trip through disk
    let snapshot_json = serde_json::to_string(undo.snapshot().unwrap()).unwrap();
    let mut resumed = SnapshotUndoManager::from_snapshot(serde_json::from_str(&snapshot_json).unwrap());

    match resumed.undo(&reloaded).await {
        UndoOutcome::Restored { restored, failures } => {
            assert_eq!(restored, 2);
            // fineprint is locked, neither its color nor its font goes back
            assert_eq!(failures.len(), 2);
        }
        UndoOutcome::NothingToUndo => panic!("snapshot was armed"),
    }
    assert_eq!(resumed.state(), UndoState::Idle);
    reloaded.save().unwrap();

    let expected: serde_json::Value = serde_json::from_str(&original).unwrap();
    let expected: Vec<DocumentNode> = serde_json::from_value(expected["elements"].clone()).unwrap();
    assert_eq!(JsonDocument::load(&path).unwrap().nodes().unwrap(), expected);
}

#[tokio::test]
async fn test_kit_swap_between_passes() {
    let dir = TempDir::new().unwrap();
    let doc = JsonDocument::load(&write_poster(dir.path())).unwrap();

    let store = Arc::new(BrandKitStore::in_memory());
    store.import(&maison_kit()).unwrap();
    let session = AuditSession::new(Arc::clone(&store));

    let first = session.run(&doc).await.unwrap();
    assert_eq!(first.kit, "Maison");

    let mut relaxed = maison_kit();
    relaxed["name"] = json!("Maison Sale");
    relaxed["allowedColors"] = json!(["#1A1A1A", "#FFFFFF", "#C9A227", "#F4EFE6", "#3A1010"]);
    relaxed["allowedFonts"] = json!(["Playfair Display", "Inter", "Lato"]);
    store.import(&relaxed).unwrap();

    let second = session.run(&doc).await.unwrap();
    assert_eq!(second.kit, "Maison Sale");
    assert!(second.violation_for("price").is_none());
    assert!(second.violation_for("cta").is_some());
}

#[test]
fn test_file_store_roundtrip_through_config() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.store.path = dir.path().join("kits");
    config.fonts.extra_known_fonts = vec!["Maison Neue".to_string()];

    let mut kit = maison_kit();
    kit["allowedFonts"] = json!(["Maison Neue", "Inter"]);

    // the stock validator rejects the house font
    let strict = BrandKitStore::new(
        Box::new(FileStore::new(&config.store.path)),
        BrandKitValidator::default(),
    );
    match strict.import(&kit) {
        Err(BrandguardError::InvalidKit(report)) => {
            assert_eq!(report.errors[0].field, "allowedFonts[0]");
        }
        other => panic!("expected invalid kit, got {:?}", other.map(|s| s.name().to_string())),
    }

    config.open_store().import(&kit).unwrap();

    let reopened = config.open_store();
    let spec = reopened.load_active().unwrap().unwrap();
    assert_eq!(spec.name(), "Maison");
    assert_eq!(spec.allowed_fonts(), ["Maison Neue", "Inter"]);
    assert!(spec.extended().typography.is_some());
    assert_eq!(reopened.list().unwrap(), vec!["Maison"]);
}

#[tokio::test]
async fn test_scan_reports_effective_background() {
    let dir = TempDir::new().unwrap();
    let doc = JsonDocument::load(&write_poster(dir.path())).unwrap();
    let scan = doc.scan().await.unwrap();

    let title = scan.elements.iter().find(|e| e.id == "title").unwrap();
    assert_eq!(title.background, Some(hex("#1A1A1A")));
    let logo = scan.elements.iter().find(|e| e.id == "logo").unwrap();
    assert_eq!(logo.fill, None);
    assert_eq!(logo.background, Some(hex("#F4EFE6")));
}
