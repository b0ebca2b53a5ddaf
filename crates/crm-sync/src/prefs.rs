// File: crm-sync/src/prefs.rs
// Purpose: Local key/value preferences (message templates, theme flag)

use crm_core::model::default_templates;
use crm_core::MessageTemplate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::Result;

pub const TEMPLATES_KEY: &str = "crm-templates-whatsapp";
pub const DARK_MODE_KEY: &str = "crm-dark-mode";

/// Synchronous string-keyed store of JSON values
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// Typed read; a missing or undecodable value yields `default()`
pub fn get_or<T: DeserializeOwned>(
    store: &dyn PreferenceStore,
    key: &str,
    default: impl FnOnce() -> T,
) -> T {
    match store.get(key) {
        Some(value) => serde_json::from_value(value).unwrap_or_else(|error| {
            tracing::warn!(key, %error, "ignoring corrupt preference");
            default()
        }),
        None => default(),
    }
}

pub fn set_typed<T: Serialize>(store: &dyn PreferenceStore, key: &str, value: &T) -> Result<()> {
    store.set(key, serde_json::to_value(value)?)
}

/// Stored templates, seeding the defaults on first read
pub fn load_templates(store: &dyn PreferenceStore) -> Vec<MessageTemplate> {
    if store.get(TEMPLATES_KEY).is_none() {
        let seeded = default_templates();
        if let Err(error) = set_typed(store, TEMPLATES_KEY, &seeded) {
            tracing::warn!(%error, "could not seed message templates");
        }
        return seeded;
    }
    get_or(store, TEMPLATES_KEY, default_templates)
}

pub fn load_dark_mode(store: &dyn PreferenceStore) -> bool {
    get_or(store, DARK_MODE_KEY, || false)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Preferences kept in one JSON object file, rewritten on every `set`
pub struct JsonFilePreferences {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl JsonFilePreferences {
    /// Open `path`; a missing file starts empty, a corrupt one is ignored
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str::<Map<String, Value>>(&content) {
                Ok(values) => values,
                Err(error) => {
                    tracing::warn!(
                        path = %path.display(),
                        %error,
                        "preferences file unreadable, starting empty"
                    );
                    Map::new()
                }
            }
        } else {
            Map::new()
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn get(&self, key: &str) -> Option<Value> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut values = lock(&self.values);
        let mut next = values.clone();
        next.insert(key.to_string(), value);

        fs::write(&self.path, serde_json::to_string_pretty(&next)?)?;
        *values = next;
        Ok(())
    }
}

/// Preferences that live only as long as the process
#[derive(Default)]
pub struct MemoryPreferences {
    values: Mutex<Map<String, Value>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<Value> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        lock(&self.values).insert(key.to_string(), value);
        Ok(())
    }
}
