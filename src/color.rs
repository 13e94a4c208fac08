// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Color normalization, distance and luminance
//!
//! Every color that reaches the audit core has been through [`Color::normalize`].
//! Accepted encodings:
//! - `#RGB` / `RGB` (shorthand, each digit doubled)
//! - `#RRGGBB` / `RRGGBB`
//! - `#AARRGGBB` / `#RRGGBBAA` (alpha dropped, see below)
//!
//! Eight-digit input carries no marker for where the alpha byte sits. If the
//! leading six digits are all zero the value is read as alpha-first and the
//! trailing six digits are kept; otherwise alpha-last is assumed.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Why a color string could not be normalized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("color value is empty")]
    Empty,

    #[error("invalid hex characters in '{0}'")]
    InvalidCharacters(String),

    #[error("expected 3, 6 or 8 hex digits, got {0}")]
    InvalidLength(usize),
}

/// A 24-bit RGB color. Displays as `#RRGGBB` (uppercase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse any accepted hex encoding into a canonical color
    pub fn normalize(input: &str) -> Result<Self, ColorError> {
        let trimmed = input.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if hex.is_empty() {
            return Err(ColorError::Empty);
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidCharacters(hex.to_string()));
        }

        let digits = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => hex.to_string(),
            8 => {
                if hex[..6].bytes().all(|b| b == b'0') {
                    hex[2..].to_string()
                } else {
                    hex[..6].to_string()
                }
            }
            n => return Err(ColorError::InvalidLength(n)),
        };

        // all ASCII hex digits at this point, the radix parses cannot fail
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).unwrap_or(0);
        Ok(Self::rgb(channel(0), channel(2), channel(4)))
    }

    /// Canonical `#RRGGBB` form
    pub fn to_hex(&self) -> String {
        self.to_string()
    }

    /// Euclidean distance in RGB space. Only meaningful for ranking.
    pub fn distance(&self, other: &Color) -> f64 {
        let dr = f64::from(self.r) - f64::from(other.r);
        let dg = f64::from(self.g) - f64::from(other.g);
        let db = f64::from(self.b) - f64::from(other.b);
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// WCAG relative luminance
    /// <https://www.w3.org/TR/WCAG21/#dfn-relative-luminance>
    pub fn luminance(&self) -> f64 {
        let [r, g, b] = [self.r, self.g, self.b].map(|c| {
            let v = f64::from(c) / 255.0;
            if v <= 0.03928 {
                v / 12.92
            } else {
                ((v + 0.055) / 1.055).powf(2.4)
            }
        });
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::normalize(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::normalize(&raw).map_err(serde::de::Error::custom)
    }
}
