//! Browser-storage abstraction for persisted checkout state.
//!
//! This crate models the two storage scopes a browser offers: a persistent
//! scope that survives reloads (local storage) and a session scope that
//! dies with the tab. Both are exposed through the same synchronous
//! [`StateStore`] trait; the in-memory implementation backs tests and the
//! demo binary.

mod memory;
mod store;

pub use memory::InMemoryStateStore;
pub use store::{StateStore, StorageError};

/// Convenience type alias for storage results.
pub type Result<T> = std::result::Result<T, StorageError>;
