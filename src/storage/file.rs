//! JSON file store.
//!
//! The whole map is rewritten on every mutation through a temporary file
//! and a rename, so the file on disk is always a complete snapshot.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::chain::types::{ConnectError, ConnectResult};
use crate::storage::KeyValueStore;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, loading existing entries if the file exists.
    pub fn open(path: impl AsRef<Path>) -> ConnectResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let file = File::open(&path).map_err(storage_err)?;
            let map: BTreeMap<String, String> = serde_json::from_reader(BufReader::new(file))
                .map_err(|e| ConnectError::Storage(format!("{}: {}", path.display(), e)))?;
            tracing::debug!(path = %path.display(), entries = map.len(), "Loaded session store");
            map
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, map: &BTreeMap<String, String>) -> ConnectResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(storage_err)?;
        }

        let tmp = self.path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp).map_err(storage_err)?);
            serde_json::to_writer_pretty(&mut writer, map)
                .map_err(|e| ConnectError::Storage(e.to_string()))?;
            writer.flush().map_err(storage_err)?;
        }
        fs::rename(&tmp, &self.path).map_err(storage_err)?;
        Ok(())
    }

    /// Apply `change` to a copy of the entries and commit it only once the
    /// file has been written.
    fn update(&self, change: impl FnOnce(&mut BTreeMap<String, String>)) -> ConnectResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| ConnectError::Storage("file store lock poisoned".to_string()))?;
        let mut next = entries.clone();
        change(&mut next);
        self.save(&next)?;
        *entries = next;
        Ok(())
    }
}

fn storage_err(e: std::io::Error) -> ConnectError {
    ConnectError::Storage(e.to_string())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn apply(&self, entries: &[(&str, &str)], keys: &[&str]) -> ConnectResult<()> {
        self.update(|map| {
            for (key, value) in entries {
                map.insert((*key).to_string(), (*value).to_string());
            }
            for key in keys {
                map.remove(*key);
            }
        })
    }
}
