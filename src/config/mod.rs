// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration for brandguard

use crate::error::{BrandguardError, Result};
use crate::kit::{BrandKitStore, BrandKitValidator, FileStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Report planned fixes without touching the document
    pub dry_run: bool,
    pub store: StoreConfig,
    pub fonts: FontConfig,
    pub tone: ToneConfig,
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding persisted brand kits
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Accepted in brand kits on top of the built-in font list
    pub extra_known_fonts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    /// Base URL of the generative language API
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the primary API key
    pub api_key_env: String,
    /// Environment variable holding the backup API key
    pub backup_api_key_env: String,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub max_text_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Undo snapshot file written next to the audited document
    pub snapshot_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("brandguard")
                .join("kits"),
        }
    }
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            backup_api_key_env: "GEMINI_API_KEY_BACKUP".to_string(),
            timeout_secs: 30,
            temperature: 0.3,
            max_output_tokens: 1000,
            max_text_length: crate::tone::MAX_TEXT_LENGTH,
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            snapshot_file: ".brandguard-undo.json".to_string(),
        }
    }
}

impl Config {
    pub fn validator(&self) -> BrandKitValidator {
        BrandKitValidator::new().with_extra_fonts(&self.fonts.extra_known_fonts)
    }

    /// File-backed kit store under `store.path`
    pub fn open_store(&self) -> BrandKitStore {
        BrandKitStore::new(Box::new(FileStore::new(&self.store.path)), self.validator())
    }

    /// Where the undo snapshot for `document` lives
    pub fn snapshot_path(&self, document: &Path) -> PathBuf {
        let dir = document.parent().unwrap_or_else(|| Path::new("."));
        let stem = document
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");
        dir.join(format!("{}{}", stem, self.audit.snapshot_file))
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("brandguard")
        .join("config.yml")
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;

    if path.extension().and_then(|s| s.to_str()) == Some("toml") {
        toml::from_str(&content)
            .map_err(|e| BrandguardError::Config(format!("TOML parse error: {}", e)))
    } else {
        serde_yaml::from_str(&content)
            .map_err(|e| BrandguardError::Config(format!("YAML parse error: {}", e)))
    }
}

pub fn write_default_config(path: &Path) -> Result<()> {
    let config = Config::default();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
        toml::to_string_pretty(&config)
            .map_err(|e| BrandguardError::Config(format!("TOML serialize error: {}", e)))?
    } else {
        serde_yaml::to_string(&config)?
    };

    std::fs::write(path, content)?;
    Ok(())
}
