// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Brand kits: the validated brand specification and its store
//!
//! A [`BrandSpecification`] is only ever produced by the validator, so holding
//! one means the palette is non-empty and duplicate-free, the fonts are known,
//! and `minContrast` is within `[0, 21]`. Specifications are shared as
//! `Arc<BrandSpecification>` and replaced, never edited.

pub mod store;
pub mod validator;

use crate::color::Color;
use serde::Serialize;

pub use store::{BrandKitStore, FileStore, KeyValueStore, MemoryStore};
pub use validator::{BrandKitValidator, FieldError, ValidationReport};

/// Accessibility policy of a brand
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityPolicy {
    pub min_contrast: f64,
}

/// Optional brand fields the audit rules do not interpret
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typography: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typography_rules: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_rules: Option<serde_json::Value>,
}

/// A normalized, validated brand kit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandSpecification {
    name: String,
    allowed_colors: Vec<Color>,
    allowed_fonts: Vec<String>,
    accessibility: AccessibilityPolicy,
    #[serde(flatten)]
    extended: ExtendedFields,
}

impl BrandSpecification {
    pub(crate) fn new(
        name: String,
        allowed_colors: Vec<Color>,
        allowed_fonts: Vec<String>,
        accessibility: AccessibilityPolicy,
        extended: ExtendedFields,
    ) -> Self {
        Self {
            name,
            allowed_colors,
            allowed_fonts,
            accessibility,
            extended,
        }
    }

    /// Validate and normalize a raw brand document with the default validator
    pub fn from_document(doc: &serde_json::Value) -> Result<Self, ValidationReport> {
        BrandKitValidator::default().normalize(doc)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Allowed colors, in the order the brand lists them
    pub fn allowed_colors(&self) -> &[Color] {
        &self.allowed_colors
    }

    pub fn allowed_fonts(&self) -> &[String] {
        &self.allowed_fonts
    }

    pub fn min_contrast(&self) -> f64 {
        self.accessibility.min_contrast
    }

    pub fn accessibility(&self) -> &AccessibilityPolicy {
        &self.accessibility
    }

    pub fn extended(&self) -> &ExtendedFields {
        &self.extended
    }

    pub fn allows_color(&self, color: &Color) -> bool {
        self.allowed_colors.contains(color)
    }

    /// The normalized kit as a brand document
    pub fn to_document(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_roundtrip_keeps_extended_fields() {
        let doc = json!({
            "name": "Acme",
            "allowedColors": ["#abc", "#000000"],
            "allowedFonts": [" Inter "],
            "accessibility": { "minContrast": 4.5 },
            "typographyRules": { "maxSize": 72, "allowUnderline": false }
        });

        let spec = BrandSpecification::from_document(&doc).unwrap();
        let out = spec.to_document().unwrap();

        assert_eq!(out["allowedColors"], json!(["#AABBCC", "#000000"]));
        assert_eq!(out["allowedFonts"], json!(["Inter"]));
        assert_eq!(out["accessibility"]["minContrast"], json!(4.5));
        assert_eq!(out["typographyRules"]["maxSize"], json!(72));
        assert!(out.get("customRules").is_none());

        // the normalized document validates to the same kit
        assert_eq!(BrandSpecification::from_document(&out).unwrap(), spec);
    }
}
