// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Document providers
//!
//! The audit core never touches a document directly. It scans through a
//! [`DocumentProvider`] and hands fixes back through it; a provider that
//! refuses a mutation returns `false` and the caller records an
//! [`ApplyFailure`].
//!
//! [`JsonDocument`] is a file-backed provider over a flat node list:
//!
//! ```json
//! { "elements": [
//!     { "id": "card", "kind": "shape", "fill": "#FFFFFF" },
//!     { "id": "title", "kind": "text", "fill": "#333", "font": "Inter", "parent": "card" }
//! ] }
//! ```

use crate::color::Color;
use crate::element::{ElementKind, ScannedElement};
use crate::error::{BrandguardError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Elements produced by one scan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
    pub elements: Vec<ScannedElement>,
}

/// Source of scanned elements and sink for fixes
#[async_trait]
pub trait DocumentProvider: Send + Sync {
    async fn scan(&self) -> Result<ScanResult>;

    /// Set an element's fill. `false` if the document refused.
    async fn apply_color(&self, id: &str, color: Color) -> bool;

    /// Set an element's font. `false` if the document refused.
    async fn apply_font(&self, id: &str, font: &str) -> bool;
}

/// Which element property a fix touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixProperty {
    Color,
    Font,
}

impl fmt::Display for FixProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixProperty::Color => write!(f, "color"),
            FixProperty::Font => write!(f, "font"),
        }
    }
}

/// A mutation the provider did not perform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyFailure {
    pub element_id: String,
    pub property: FixProperty,
    pub value: String,
}

impl ApplyFailure {
    pub fn new(element_id: &str, property: FixProperty, value: impl Into<String>) -> Self {
        Self {
            element_id: element_id.to_string(),
            property,
            value: value.into(),
        }
    }
}

/// Apply a color through a provider, logging and returning any refusal
pub async fn try_apply_color(
    provider: &dyn DocumentProvider,
    id: &str,
    color: Color,
) -> Option<ApplyFailure> {
    if provider.apply_color(id, color).await {
        debug!(element = %id, color = %color, "Applied color");
        None
    } else {
        warn!(element = %id, color = %color, "Provider refused color change");
        Some(ApplyFailure::new(id, FixProperty::Color, color.to_hex()))
    }
}

/// Apply a font through a provider, logging and returning any refusal
pub async fn try_apply_font(
    provider: &dyn DocumentProvider,
    id: &str,
    font: &str,
) -> Option<ApplyFailure> {
    if provider.apply_font(id, font).await {
        debug!(element = %id, font = %font, "Applied font");
        None
    } else {
        warn!(element = %id, font = %font, "Provider refused font change");
        Some(ApplyFailure::new(id, FixProperty::Font, font))
    }
}

/// One node of a JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    pub id: String,
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Id of the enclosing node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Locked nodes refuse every mutation
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub locked: bool,
}

impl DocumentNode {
    pub fn new(id: &str, kind: ElementKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
            fill: None,
            font: None,
            text: None,
            parent: None,
            locked: false,
        }
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_font(mut self, font: &str) -> Self {
        self.font = Some(font.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct DocumentFile {
    elements: Vec<DocumentNode>,
}

/// File-backed document provider
#[derive(Debug)]
pub struct JsonDocument {
    path: Option<PathBuf>,
    nodes: Mutex<Vec<DocumentNode>>,
}

impl JsonDocument {
    /// In-memory document, `save` is unavailable
    pub fn from_nodes(nodes: Vec<DocumentNode>) -> Self {
        Self {
            path: None,
            nodes: Mutex::new(nodes),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let file: DocumentFile = serde_json::from_str(&json)?;
        debug!(path = %path.display(), nodes = file.elements.len(), "Loaded document");
        Ok(Self {
            path: Some(path.to_path_buf()),
            nodes: Mutex::new(file.elements),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the document back to the file it was loaded from
    pub fn save(&self) -> Result<()> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| BrandguardError::InvalidInput("document has no backing file".to_string()))?;
        self.save_to(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let file = DocumentFile {
            elements: self.nodes()?,
        };
        std::fs::write(path, serde_json::to_string_pretty(&file)?)?;
        debug!(path = %path.display(), "Saved document");
        Ok(())
    }

    /// Copy of the current node list
    pub fn nodes(&self) -> Result<Vec<DocumentNode>> {
        self.nodes
            .lock()
            .map(|nodes| nodes.clone())
            .map_err(|_| BrandguardError::Storage("document lock poisoned".to_string()))
    }

    pub fn node(&self, id: &str) -> Option<DocumentNode> {
        let nodes = self.nodes.lock().ok()?;
        nodes.iter().find(|n| n.id == id).cloned()
    }

    fn mutate(&self, id: &str, apply: impl FnOnce(&mut DocumentNode)) -> bool {
        let Ok(mut nodes) = self.nodes.lock() else {
            return false;
        };
        match nodes.iter_mut().find(|n| n.id == id) {
            Some(node) if !node.locked => {
                apply(node);
                true
            }
            _ => false,
        }
    }
}

/// Fill of the nearest ancestor that has one
fn resolve_background(
    nodes: &[DocumentNode],
    index: &HashMap<&str, usize>,
    node: &DocumentNode,
) -> Option<Color> {
    let mut parent = node.parent.as_deref();
    // bounded walk, a malformed document may contain parent cycles
    for _ in 0..nodes.len() {
        let ancestor = &nodes[*index.get(parent?)?];
        if ancestor.fill.is_some() {
            return ancestor.fill;
        }
        parent = ancestor.parent.as_deref();
    }
    None
}

#[async_trait]
impl DocumentProvider for JsonDocument {
    async fn scan(&self) -> Result<ScanResult> {
        let nodes = self.nodes()?;
        let index: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();

        let elements = nodes
            .iter()
            .map(|node| ScannedElement {
                id: node.id.clone(),
                kind: node.kind.clone(),
                fill: node.fill,
                background: resolve_background(&nodes, &index, node),
                font: node.font.clone(),
                text: node.text.clone(),
            })
            .collect();

        Ok(ScanResult { elements })
    }

    async fn apply_color(&self, id: &str, color: Color) -> bool {
        self.mutate(id, |node| node.fill = Some(color))
    }

    async fn apply_font(&self, id: &str, font: &str) -> bool {
        let font = font.trim().to_string();
        self.mutate(id, move |node| node.font = Some(font))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn hex(s: &str) -> Color {
        Color::normalize(s).unwrap()
    }

    fn sample() -> JsonDocument {
        JsonDocument::from_nodes(vec![
            DocumentNode::new("page", ElementKind::Shape).with_fill(Color::WHITE),
            DocumentNode::new("group", ElementKind::Group).with_parent("page"),
            DocumentNode::new("card", ElementKind::Shape)
                .with_fill(hex("#1A1A1A"))
                .with_parent("group"),
            DocumentNode::new("title", ElementKind::Text)
                .with_fill(hex("#EEEEEE"))
                .with_font("Inter")
                .with_parent("card"),
            DocumentNode::new("caption", ElementKind::Text)
                .with_fill(hex("#333333"))
                .with_parent("group")
                .locked(),
        ])
    }

    #[tokio::test]
    async fn test_scan_resolves_nearest_filled_ancestor() {
        let doc = sample();
        let scan = doc.scan().await.unwrap();
        let by_id: HashMap<_, _> = scan.elements.iter().map(|e| (e.id.as_str(), e)).collect();

        assert_eq!(by_id["page"].background, None);
        assert_eq!(by_id["card"].background, Some(Color::WHITE));
        assert_eq!(by_id["title"].background, Some(hex("#1A1A1A")));
        // group has no fill, so the page shows through
        assert_eq!(by_id["caption"].background, Some(Color::WHITE));
    }

    #[tokio::test]
    async fn test_parent_cycle_terminates() {
        let doc = JsonDocument::from_nodes(vec![
            DocumentNode::new("a", ElementKind::Group).with_parent("b"),
            DocumentNode::new("b", ElementKind::Group).with_parent("a"),
            DocumentNode::new("c", ElementKind::Text).with_fill(Color::BLACK).with_parent("a"),
        ]);
        let scan = doc.scan().await.unwrap();
        assert!(scan.elements.iter().all(|e| e.background.is_none()));
    }

    #[tokio::test]
    async fn test_apply_and_refuse() {
        let doc = sample();

        assert!(doc.apply_color("title", Color::BLACK).await);
        assert!(doc.apply_font("title", " Playfair Display ").await);
        let title = doc.node("title").unwrap();
        assert_eq!(title.fill, Some(Color::BLACK));
        assert_eq!(title.font.as_deref(), Some("Playfair Display"));

        assert!(!doc.apply_color("caption", Color::BLACK).await);
        assert!(!doc.apply_color("missing", Color::BLACK).await);
        assert_eq!(doc.node("caption").unwrap().fill, Some(hex("#333333")));
    }

    #[tokio::test]
    async fn test_apply_helpers_report_failures() {
        let doc = sample();
        assert!(try_apply_color(&doc, "title", Color::BLACK).await.is_none());

        let failure = try_apply_font(&doc, "caption", "Inter").await.unwrap();
        assert_eq!(failure, ApplyFailure::new("caption", FixProperty::Font, "Inter"));
    }

    #[test]
    fn test_load_and_save_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(
            &path,
            r##"{ "elements": [
                { "id": "bg", "kind": "shape", "fill": "#fff" },
                { "id": "t", "kind": "text", "fill": "#000000ff", "parent": "bg", "locked": true },
                { "id": "x", "kind": "sticker" }
            ] }"##,
        )
        .unwrap();

        let doc = JsonDocument::load(&path).unwrap();
        let nodes = doc.nodes().unwrap();
        assert_eq!(nodes[0].fill, Some(Color::WHITE));
        assert_eq!(nodes[1].fill, Some(hex("#0000FF")));
        assert!(nodes[1].locked);
        assert_eq!(nodes[2].kind, ElementKind::Other);

        doc.save().unwrap();
        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("\"#FFFFFF\""));
        assert_eq!(JsonDocument::load(&path).unwrap().nodes().unwrap(), nodes);
    }

    #[test]
    fn test_invalid_color_in_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"{ "elements": [ { "id": "a", "kind": "shape", "fill": "red" } ] }"#)
            .unwrap();
        assert!(matches!(JsonDocument::load(&path), Err(BrandguardError::Json(_))));
    }
}
