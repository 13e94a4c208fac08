// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Brand kit store
//!
//! Holds the one active [`BrandSpecification`] and persists kits through an
//! injected key-value collaborator. The active kit is swapped by reference:
//! readers clone the `Arc` and keep auditing against it even if another kit is
//! activated meanwhile.

use super::validator::BrandKitValidator;
use super::BrandSpecification;
use crate::error::{BrandguardError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

const ACTIVE_KEY: &str = "brandkit.active";
const INDEX_KEY: &str = "brandkit.index";

/// Persistence collaborator: plain string key-value storage
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-process storage, lost on drop
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| BrandguardError::Storage("memory store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| BrandguardError::Storage("memory store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key under a base directory
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe_name = key.replace(['/', '\\', ':'], "_");
        self.base_path.join(format!("{}.json", safe_name))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let value = std::fs::read_to_string(&path)?;
        debug!(path = %path.display(), "Loaded store entry");
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.base_path)?;
        let path = self.path_for(key);
        std::fs::write(&path, value)?;
        debug!(path = %path.display(), "Saved store entry");
        Ok(())
    }
}

/// Registry of brand kits with a single active specification
pub struct BrandKitStore {
    persistence: Box<dyn KeyValueStore>,
    validator: BrandKitValidator,
    active: RwLock<Option<Arc<BrandSpecification>>>,
}

impl BrandKitStore {
    pub fn new(persistence: Box<dyn KeyValueStore>, validator: BrandKitValidator) -> Self {
        Self {
            persistence,
            validator,
            active: RwLock::new(None),
        }
    }

    /// Store backed by [`MemoryStore`] and the default validator
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()), BrandKitValidator::default())
    }

    pub fn validator(&self) -> &BrandKitValidator {
        &self.validator
    }

    /// Current active kit, if any
    pub fn active(&self) -> Option<Arc<BrandSpecification>> {
        match self.active.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn require_active(&self) -> Result<Arc<BrandSpecification>> {
        self.active().ok_or(BrandguardError::NoActiveKit)
    }

    /// Swap the active kit without persisting it
    pub fn set_active(&self, spec: Arc<BrandSpecification>) {
        info!(kit = %spec.name(), "Activated brand kit");
        match self.active.write() {
            Ok(mut guard) => *guard = Some(spec),
            Err(poisoned) => *poisoned.into_inner() = Some(spec),
        }
    }

    /// Validate a raw document, persist it, and make it the active kit
    pub fn import(&self, doc: &serde_json::Value) -> Result<Arc<BrandSpecification>> {
        let spec = self
            .validator
            .normalize(doc)
            .map_err(BrandguardError::InvalidKit)?;

        let name = spec.name().to_string();
        let json = serde_json::to_string_pretty(&spec)?;
        self.persistence.set(&kit_key(&name), &json)?;

        let mut names = self.list()?;
        if !names.contains(&name) {
            names.push(name.clone());
            self.persistence
                .set(INDEX_KEY, &serde_json::to_string(&names)?)?;
        }
        self.persistence.set(ACTIVE_KEY, &name)?;

        let spec = Arc::new(spec);
        self.set_active(Arc::clone(&spec));
        Ok(spec)
    }

    /// Load a persisted kit by name and make it active
    pub fn activate(&self, name: &str) -> Result<Arc<BrandSpecification>> {
        let json = self
            .persistence
            .get(&kit_key(name))?
            .ok_or_else(|| BrandguardError::NotFound(format!("brand kit '{}'", name)))?;

        // stored kits are re-validated, the store may have been edited by hand
        let doc: serde_json::Value = serde_json::from_str(&json)?;
        let spec = self
            .validator
            .normalize(&doc)
            .map_err(BrandguardError::InvalidKit)?;

        self.persistence.set(ACTIVE_KEY, spec.name())?;
        let spec = Arc::new(spec);
        self.set_active(Arc::clone(&spec));
        Ok(spec)
    }

    /// Restore the persisted active kit, if one was recorded
    pub fn load_active(&self) -> Result<Option<Arc<BrandSpecification>>> {
        match self.persistence.get(ACTIVE_KEY)? {
            Some(name) => self.activate(name.trim()).map(Some),
            None => Ok(None),
        }
    }

    /// Names of all persisted kits, in import order
    pub fn list(&self) -> Result<Vec<String>> {
        match self.persistence.get(INDEX_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }
}

fn kit_key(name: &str) -> String {
    let slug: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    format!("brandkit.{}", slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn kit(name: &str, colors: serde_json::Value) -> serde_json::Value {
        json!({
            "name": name,
            "allowedColors": colors,
            "allowedFonts": ["Inter"],
            "accessibility": { "minContrast": 4.5 }
        })
    }

    #[test]
    fn test_import_activates() {
        let store = BrandKitStore::in_memory();
        assert!(store.active().is_none());
        assert!(matches!(store.require_active(), Err(BrandguardError::NoActiveKit)));

        let spec = store.import(&kit("Acme", json!(["#000"]))).unwrap();
        assert_eq!(store.active().unwrap().name(), "Acme");
        assert!(Arc::ptr_eq(&spec, &store.active().unwrap()));
    }

    #[test]
    fn test_invalid_import_keeps_previous() {
        let store = BrandKitStore::in_memory();
        store.import(&kit("Acme", json!(["#000"]))).unwrap();

        let err = store.import(&kit("Broken", json!(["nope"]))).unwrap_err();
        match err {
            BrandguardError::InvalidKit(report) => {
                assert_eq!(report.errors[0].field, "allowedColors[0]");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.active().unwrap().name(), "Acme");
    }

    #[test]
    fn test_swap_leaves_held_reference_intact() {
        let store = BrandKitStore::in_memory();
        let first = store.import(&kit("First", json!(["#111111"]))).unwrap();
        let held = store.active().unwrap();

        store.import(&kit("Second", json!(["#222222"]))).unwrap();

        assert_eq!(held.name(), "First");
        assert!(Arc::ptr_eq(&held, &first));
        assert_eq!(store.active().unwrap().name(), "Second");
        assert_eq!(store.list().unwrap(), vec!["First", "Second"]);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();

        {
            let store = BrandKitStore::new(
                Box::new(FileStore::new(dir.path())),
                BrandKitValidator::default(),
            );
            store.import(&kit("Maison", json!(["#C9A227", "#000"]))).unwrap();
        }

        let reopened = BrandKitStore::new(
            Box::new(FileStore::new(dir.path())),
            BrandKitValidator::default(),
        );
        assert!(reopened.active().is_none());
        let spec = reopened.load_active().unwrap().unwrap();
        assert_eq!(spec.name(), "Maison");
        assert_eq!(spec.allowed_colors().len(), 2);
    }

    #[test]
    fn test_activate_unknown_kit() {
        let store = BrandKitStore::in_memory();
        assert!(matches!(
            store.activate("ghost"),
            Err(BrandguardError::NotFound(_))
        ));
    }

    #[test]
    fn test_kit_key_slug() {
        assert_eq!(kit_key("Maison Lumière"), "brandkit.maison-lumière");
        assert_eq!(kit_key("a/b:c"), "brandkit.a-b-c");
    }
}
