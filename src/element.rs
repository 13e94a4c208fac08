// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Scanned document elements

use crate::color::Color;
use serde::{Deserialize, Serialize};

/// Kind of document node. Only the text/non-text distinction affects rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Shape,
    Image,
    Group,
    #[serde(other)]
    Other,
}

impl ElementKind {
    pub fn is_text(&self) -> bool {
        matches!(self, ElementKind::Text)
    }
}

/// Read-only snapshot of one document node at audit time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedElement {
    pub id: String,
    pub kind: ElementKind,
    /// Fill color of the node itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    /// Fill of the nearest ancestor that has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ScannedElement {
    pub fn new(id: &str, kind: ElementKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
            fill: None,
            background: None,
            font: None,
            text: None,
        }
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = Some(background);
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
}
