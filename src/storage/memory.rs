//! In-process store. Nothing survives the process.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::chain::types::{ConnectError, ConnectResult};
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> ConnectError {
    ConnectError::Storage("memory store lock poisoned".to_string())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.read().ok()?.get(key).cloned()
    }

    fn apply(&self, entries: &[(&str, &str)], keys: &[&str]) -> ConnectResult<()> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}
