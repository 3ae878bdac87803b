//! Key/value store shared by every execution of one activation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use rhai::{Array, Dynamic, Engine, INT, ImmutableString};

/// Host-owned store that survives across executions.
///
/// Clones refer to the same entries. The scope builder injects a clone into
/// every scope, so a value written by one script is visible to the next.
#[derive(Clone, Default)]
pub struct PersistentStore {
    entries: Arc<RwLock<BTreeMap<String, Dynamic>>>,
}

impl PersistentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Dynamic> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Stores a value, returning the previous one.
    pub fn insert(&self, key: impl Into<String>, value: Dynamic) -> Option<Dynamic> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value)
    }

    pub fn remove(&self, key: &str) -> Option<Dynamic> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentStore")
            .field("keys", &self.keys())
            .finish()
    }
}

/// Registers the rhai type `Store`. Missing keys read as `()`.
pub(crate) fn register_store_api(engine: &mut Engine) {
    engine
        .register_type_with_name::<PersistentStore>("Store")
        .register_indexer_get(|s: &mut PersistentStore, key: ImmutableString| {
            s.get(key.as_str()).unwrap_or(Dynamic::UNIT)
        })
        .register_indexer_set(
            |s: &mut PersistentStore, key: ImmutableString, value: Dynamic| {
                s.insert(key.as_str(), value);
            },
        )
        .register_fn("get", |s: &mut PersistentStore, key: &str| {
            s.get(key).unwrap_or(Dynamic::UNIT)
        })
        .register_fn("set", |s: &mut PersistentStore, key: &str, value: Dynamic| {
            s.insert(key, value);
        })
        .register_fn("contains", |s: &mut PersistentStore, key: &str| {
            s.contains_key(key)
        })
        .register_fn("remove", |s: &mut PersistentStore, key: &str| {
            s.remove(key).unwrap_or(Dynamic::UNIT)
        })
        .register_fn("keys", |s: &mut PersistentStore| -> Array {
            s.keys().into_iter().map(Dynamic::from).collect()
        })
        .register_fn("len", |s: &mut PersistentStore| s.len() as INT)
        .register_fn("clear", |s: &mut PersistentStore| s.clear())
        .register_fn("to_string", |s: &mut PersistentStore| {
            format!("Store({} entries)", s.len())
        });
}
