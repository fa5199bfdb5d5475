//! Versioned, namespaced root blob on top of [`KeyValueStorage`].
//!
//! The blob is a JSON mapping: one entry per state slice plus a `_persist` entry
//! holding the version it was written with.

use anyhow::Result;
use cinelist_config::StorageConfig;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::storage::KeyValueStorage;

pub const META_KEY: &str = "_persist";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistConfig {
    pub namespace: String,
    pub version: u32,
}

impl PersistConfig {
    pub fn new(namespace: impl Into<String>, version: u32) -> Self {
        Self {
            namespace: namespace.into(),
            version,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.namespace.clone(), config.version)
    }

    /// Storage key of the root blob, `persist:<namespace>`.
    pub fn key(&self) -> String {
        format!("persist:{}", self.namespace)
    }

    pub fn backup_key(&self) -> String {
        format!("{}.bak", self.key())
    }
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self::from_config(&StorageConfig::default())
    }
}

/// Load the stored root and reconcile it with `initial`.
///
/// A missing blob yields `initial`. A blob that cannot be parsed, or that was
/// written by a newer version, is copied to the backup key and `initial` is used.
pub fn rehydrate<S: KeyValueStorage + ?Sized>(
    storage: &S,
    config: &PersistConfig,
    initial: Value,
) -> Result<Value> {
    let key = config.key();
    let Some(raw) = storage.get_item(&key)? else {
        debug!("No persisted state under {}", key);
        return Ok(initial);
    };

    let inbound = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!("Persisted state under {} is not a mapping ({}), starting fresh", key, type_name(&other));
            backup(storage, config, &raw)?;
            return Ok(initial);
        }
        Err(e) => {
            warn!("Persisted state under {} is corrupt: {}. Starting fresh.", key, e);
            backup(storage, config, &raw)?;
            return Ok(initial);
        }
    };

    let stored_version = inbound
        .get(META_KEY)
        .and_then(|meta| meta.get("version"))
        .and_then(Value::as_u64)
        .unwrap_or(0);
    if stored_version > u64::from(config.version) {
        warn!(
            "Persisted state under {} has version {} but this build understands {}. Starting fresh.",
            key, stored_version, config.version
        );
        backup(storage, config, &raw)?;
        return Ok(initial);
    }

    Ok(merge_level_two(initial, inbound))
}

/// Write `state` (a mapping of slices) as the root blob.
pub fn persist<S: KeyValueStorage + ?Sized>(
    storage: &S,
    config: &PersistConfig,
    state: &Value,
) -> Result<()> {
    let mut root = Map::new();
    root.insert(META_KEY.to_string(), json!({ "version": config.version }));
    if let Value::Object(slices) = state {
        for (name, slice) in slices {
            root.insert(name.clone(), slice.clone());
        }
    }
    storage.set_item(&config.key(), &serde_json::to_string(&Value::Object(root))?)
}

/// Reconcile two levels deep: inbound slices that are mappings are merged over the
/// initial slice key by key, anything else replaces the initial value outright.
pub fn merge_level_two(initial: Value, inbound: Map<String, Value>) -> Value {
    let mut state = match initial {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    for (name, slice) in inbound {
        if name == META_KEY {
            continue;
        }
        let merged = match (state.remove(&name), slice) {
            (Some(Value::Object(mut base)), Value::Object(incoming)) => {
                base.extend(incoming);
                Value::Object(base)
            }
            (_, incoming) => incoming,
        };
        state.insert(name, merged);
    }

    Value::Object(state)
}

fn backup<S: KeyValueStorage + ?Sized>(storage: &S, config: &PersistConfig, raw: &str) -> Result<()> {
    let backup_key = config.backup_key();
    storage.set_item(&backup_key, raw)?;
    info!("Backed up unreadable persisted state to {}", backup_key);
    Ok(())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn initial() -> Value {
        json!({"wishlist": {"listWishlist": [], "lastSort": "rating"}, "theme": "dark"})
    }

    #[test]
    fn test_missing_blob_returns_initial() {
        let storage = MemoryStorage::new();
        let state = rehydrate(&storage, &PersistConfig::default(), initial()).unwrap();
        assert_eq!(state, initial());
    }

    #[test]
    fn test_persist_writes_versioned_root() {
        let storage = MemoryStorage::new();
        let config = PersistConfig::new("root", 3);
        persist(&storage, &config, &json!({"wishlist": {"listWishlist": []}})).unwrap();

        let raw = storage.get_item("persist:root").unwrap().unwrap();
        let root: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(root["_persist"]["version"], 3);
        assert_eq!(root["wishlist"], json!({"listWishlist": []}));
    }

    #[test]
    fn test_level_two_merge_keeps_new_initial_keys() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                "persist:root",
                r#"{"_persist":{"version":1},"wishlist":{"listWishlist":[{"id":7}]},"theme":"light"}"#,
            )
            .unwrap();

        let state = rehydrate(&storage, &PersistConfig::default(), initial()).unwrap();
        assert_eq!(
            state,
            json!({
                "wishlist": {"listWishlist": [{"id": 7}], "lastSort": "rating"},
                "theme": "light"
            })
        );
    }

    #[test]
    fn test_corrupt_blob_is_backed_up() {
        let storage = MemoryStorage::new();
        storage.set_item("persist:root", "{not json").unwrap();

        let state = rehydrate(&storage, &PersistConfig::default(), initial()).unwrap();
        assert_eq!(state, initial());
        assert_eq!(
            storage.get_item("persist:root.bak").unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn test_newer_version_is_backed_up() {
        let storage = MemoryStorage::new();
        let blob = r#"{"_persist":{"version":9},"wishlist":{"listWishlist":[{"id":1}]}}"#;
        storage.set_item("persist:root", blob).unwrap();

        let state = rehydrate(&storage, &PersistConfig::new("root", 2), initial()).unwrap();
        assert_eq!(state, initial());
        assert_eq!(storage.get_item("persist:root.bak").unwrap().as_deref(), Some(blob));
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let storage = MemoryStorage::new();
        persist(&storage, &PersistConfig::new("a", 1), &json!({"theme": "a"})).unwrap();

        let state = rehydrate(&storage, &PersistConfig::new("b", 1), initial()).unwrap();
        assert_eq!(state, initial());
    }
}
