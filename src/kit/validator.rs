// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Brand kit schema validation
//!
//! Untrusted brand documents are checked field by field and every problem is
//! reported, in document order: `name`, `allowedColors[i]`, `allowedFonts[i]`,
//! `accessibility.minContrast`, then the optional extended sections. Input that
//! is not an object (or is an empty object) yields a single `root` error.

use super::{AccessibilityPolicy, BrandSpecification, ExtendedFields};
use crate::color::Color;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

pub const MAX_CONTRAST: f64 = 21.0;

/// Optional sections passed through without interpretation
const EXTENDED_SECTIONS: [&str; 4] = ["typography", "typographyRules", "colors", "customRules"];

/// Fonts a brand kit may reference
pub const KNOWN_FONTS: &[&str] = &[
    "Adobe Clean",
    "Archivo",
    "Arial",
    "Avenir",
    "Barlow",
    "Bebas Neue",
    "Bodoni Moda",
    "Cormorant Garamond",
    "Courier New",
    "DM Sans",
    "DM Serif Display",
    "Didot",
    "EB Garamond",
    "Fira Sans",
    "Futura",
    "Garamond",
    "Georgia",
    "Gill Sans",
    "Helvetica",
    "Helvetica Neue",
    "IBM Plex Sans",
    "IBM Plex Serif",
    "Inter",
    "Josefin Sans",
    "Karla",
    "Lato",
    "Libre Baskerville",
    "Lora",
    "Manrope",
    "Merriweather",
    "Minion Pro",
    "Montserrat",
    "Mulish",
    "Myriad Pro",
    "Noto Sans",
    "Noto Serif",
    "Nunito",
    "Open Sans",
    "Oswald",
    "Outfit",
    "PT Sans",
    "PT Serif",
    "Playfair Display",
    "Poppins",
    "Quicksand",
    "Raleway",
    "Roboto",
    "Roboto Mono",
    "Rubik",
    "Segoe UI",
    "Source Sans 3",
    "Source Sans Pro",
    "Source Serif Pro",
    "Space Grotesk",
    "Tahoma",
    "Times New Roman",
    "Trebuchet MS",
    "Ubuntu",
    "Verdana",
    "Work Sans",
];

/// One validation problem, addressed by field path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Outcome of validating a brand document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<FieldError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Errors for one field path
    pub fn errors_for(&self, field: &str) -> Vec<&FieldError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }
}

/// Validates brand documents against the kit schema and a closed font set
#[derive(Debug, Clone)]
pub struct BrandKitValidator {
    /// Lowercased known font names
    known_fonts: HashSet<String>,
}

impl Default for BrandKitValidator {
    fn default() -> Self {
        Self {
            known_fonts: KNOWN_FONTS.iter().map(|f| f.to_lowercase()).collect(),
        }
    }
}

impl BrandKitValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the known font set
    pub fn with_extra_fonts<I, S>(mut self, fonts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.known_fonts
            .extend(fonts.into_iter().map(|f| f.as_ref().trim().to_lowercase()));
        self
    }

    pub fn is_known_font(&self, font: &str) -> bool {
        self.known_fonts.contains(&font.trim().to_lowercase())
    }

    /// Check a document and report every problem found
    pub fn validate(&self, doc: &Value) -> ValidationReport {
        match self.normalize(doc) {
            Ok(_) => ValidationReport::from_errors(Vec::new()),
            Err(report) => report,
        }
    }

    /// Validate and, if clean, produce the normalized specification
    pub fn normalize(&self, doc: &Value) -> Result<BrandSpecification, ValidationReport> {
        let obj = match doc.as_object() {
            Some(obj) if obj.is_empty() => {
                return Err(root_error("brand kit is empty"));
            }
            Some(obj) => obj,
            None => return Err(root_error("brand kit must be a JSON object")),
        };

        let mut errors = Vec::new();
        let name = check_name(obj, &mut errors);
        let colors = check_colors(obj, &mut errors);
        let fonts = self.check_fonts(obj, &mut errors);
        let min_contrast = check_min_contrast(obj, &mut errors);
        let extended = check_extended(obj, &mut errors);

        match (name, colors, fonts, min_contrast) {
            (Some(name), Some(colors), Some(fonts), Some(min_contrast)) if errors.is_empty() => {
                Ok(BrandSpecification::new(
                    name,
                    colors,
                    fonts,
                    AccessibilityPolicy { min_contrast },
                    extended,
                ))
            }
            _ => Err(ValidationReport::from_errors(errors)),
        }
    }

    fn check_fonts(&self, obj: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<Vec<String>> {
        let items = non_empty_array(obj, "allowedFonts", "font", errors)?;
        let mut fonts = Vec::with_capacity(items.len());
        let mut seen: HashMap<String, usize> = HashMap::new();
        let before = errors.len();

        for (i, item) in items.iter().enumerate() {
            let field = format!("allowedFonts[{}]", i);
            let Some(raw) = item.as_str() else {
                errors.push(FieldError::new(field, "must be a string"));
                continue;
            };

            let font = raw.trim();
            if font.is_empty() {
                errors.push(FieldError::new(field, "must not be empty"));
                continue;
            }

            let key = font.to_lowercase();
            if let Some(&first) = seen.get(&key) {
                errors.push(FieldError::new(
                    field,
                    format!("duplicate of allowedFonts[{}] ('{}')", first, font),
                ));
                continue;
            }
            seen.insert(key, i);

            if !self.is_known_font(font) {
                errors.push(FieldError::new(field, format!("unknown font '{}'", font)));
                continue;
            }

            fonts.push(font.to_string());
        }

        (errors.len() == before).then_some(fonts)
    }
}

fn root_error(message: &str) -> ValidationReport {
    ValidationReport::from_errors(vec![FieldError::new("root", message)])
}

fn check_name(obj: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<String> {
    match obj.get("name") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("name", "is required"));
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push(FieldError::new("name", "must not be empty"));
            None
        }
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(_) => {
            errors.push(FieldError::new("name", "must be a string"));
            None
        }
    }
}

/// Shared shape check for the two list fields
fn non_empty_array<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
    noun: &str,
    errors: &mut Vec<FieldError>,
) -> Option<&'a Vec<Value>> {
    match obj.get(field) {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(field, "is required"));
            None
        }
        Some(Value::Array(items)) if items.is_empty() => {
            errors.push(FieldError::new(field, format!("must contain at least one {}", noun)));
            None
        }
        Some(Value::Array(items)) => Some(items),
        Some(_) => {
            errors.push(FieldError::new(field, format!("must be an array of {}s", noun)));
            None
        }
    }
}

fn check_colors(obj: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<Vec<Color>> {
    let items = non_empty_array(obj, "allowedColors", "color", errors)?;
    let mut colors = Vec::with_capacity(items.len());
    let mut seen: HashMap<Color, usize> = HashMap::new();
    let before = errors.len();

    for (i, item) in items.iter().enumerate() {
        let field = format!("allowedColors[{}]", i);
        let Some(raw) = item.as_str() else {
            errors.push(FieldError::new(field, "must be a string"));
            continue;
        };

        let color = match Color::normalize(raw) {
            Ok(color) => color,
            Err(e) => {
                errors.push(FieldError::new(field, e.to_string()));
                continue;
            }
        };

        if let Some(&first) = seen.get(&color) {
            errors.push(FieldError::new(
                field,
                format!("duplicate of allowedColors[{}] ({})", first, color),
            ));
            continue;
        }
        seen.insert(color, i);
        colors.push(color);
    }

    (errors.len() == before).then_some(colors)
}

fn check_min_contrast(obj: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<f64> {
    const FIELD: &str = "accessibility.minContrast";

    let accessibility = match obj.get("accessibility") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(FIELD, "is required"));
            return None;
        }
        Some(Value::Object(a)) => a,
        Some(_) => {
            errors.push(FieldError::new("accessibility", "must be an object"));
            return None;
        }
    };

    match accessibility.get("minContrast") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(FIELD, "is required"));
            None
        }
        Some(Value::Number(n)) => {
            let value = n.as_f64().unwrap_or(f64::NAN);
            if (0.0..=MAX_CONTRAST).contains(&value) {
                Some(value)
            } else {
                errors.push(FieldError::new(
                    FIELD,
                    format!("must be between 0 and {}, got {}", MAX_CONTRAST, n),
                ));
                None
            }
        }
        Some(_) => {
            errors.push(FieldError::new(FIELD, "must be a number"));
            None
        }
    }
}

fn check_extended(obj: &Map<String, Value>, errors: &mut Vec<FieldError>) -> ExtendedFields {
    let mut section = |key: &str| match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(v @ Value::Object(_)) => Some(v.clone()),
        Some(_) => {
            errors.push(FieldError::new(key, "must be an object"));
            None
        }
    };

    let [typography, typography_rules, colors, custom_rules] = EXTENDED_SECTIONS.map(&mut section);
    ExtendedFields {
        typography,
        typography_rules,
        colors,
        custom_rules,
    }
}
