// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for brandguard

use crate::color::ColorError;
use crate::kit::validator::ValidationReport;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrandguardError>;

#[derive(Error, Debug)]
pub enum BrandguardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Brand kit failed validation ({} error(s))", .0.errors.len())]
    InvalidKit(ValidationReport),

    #[error("Invalid color: {0}")]
    Color(#[from] ColorError),

    #[error("No active brand kit")]
    NoActiveKit,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Tone service error: {0}")]
    ToneService(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
