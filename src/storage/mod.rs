//! Durable string-keyed storage for session fields.
//!
//! Multi-key writes and removals are atomic: a reader never observes one
//! key of a pair updated without the other.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::chain::types::ConnectResult;

/// Key/value storage the container persists session fields into.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Write `entries` and remove `keys` in one step. Missing keys are
    /// ignored.
    fn apply(&self, entries: &[(&str, &str)], keys: &[&str]) -> ConnectResult<()>;

    fn set_many(&self, entries: &[(&str, &str)]) -> ConnectResult<()> {
        self.apply(entries, &[])
    }

    fn remove_many(&self, keys: &[&str]) -> ConnectResult<()> {
        self.apply(&[], keys)
    }

    fn set(&self, key: &str, value: &str) -> ConnectResult<()> {
        self.set_many(&[(key, value)])
    }

    fn remove(&self, key: &str) -> ConnectResult<()> {
        self.remove_many(&[key])
    }
}
