pub mod json_backend;
pub mod memory;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::errors::BudgetError;

pub type Result<T> = std::result::Result<T, BudgetError>;

/// Durable key-value persistence for JSON documents.
///
/// Writes are best-effort and not transactional: two processes sharing the
/// same backing store may overwrite each other.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, `None` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&self, key: &str, value: &Value) -> Result<()>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Reads and decodes `key`, treating every read or parse failure as absent data.
pub fn load_item<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let value = match store.get(key) {
        Ok(Some(value)) => value,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(key, error = %err, "failed to read persisted value");
            return None;
        }
    };
    match serde_json::from_value(value) {
        Ok(item) => Some(item),
        Err(err) => {
            tracing::warn!(key, error = %err, "persisted value has an unexpected shape");
            None
        }
    }
}

/// Encodes `value` as JSON and stores it under `key`.
pub fn save_item<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let json = serde_json::to_value(value)?;
    store.set(key, &json)
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
