//! The storage trait and its error type.

use thiserror::Error;

/// Errors that can occur when touching browser storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected a write for lack of space.
    #[error("storage quota exceeded writing key '{key}'")]
    QuotaExceeded { key: String },
}

/// A synchronous string key/value store with web-storage semantics.
///
/// Browser storage is synchronous and string-typed; this trait mirrors
/// that surface so the persistence bridge reads the same against a real
/// backend or the in-memory one.
pub trait StateStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> crate::Result<Option<String>>;

    /// Stores `value` under `key`, replacing any existing value.
    fn put(&self, key: &str, value: &str) -> crate::Result<()>;

    /// Removes the value stored under `key`. Removing a missing key is not
    /// an error.
    fn remove(&self, key: &str) -> crate::Result<()>;
}
