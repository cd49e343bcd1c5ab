//! Persistence bridge for wizard progress.
//!
//! Scoped to a single checkout attempt: the blob is written on every state
//! change, merged back on mount, and deleted when the shopper leaves the
//! checkout route or a COD order completes.

use std::sync::Arc;

use domain::{CheckoutState, RestorePayload};
use state_store::StateStore;

/// Persistent-storage key for the serialized wizard subset.
pub const CHECKOUT_STATE_KEY: &str = "checkoutState";

/// Serializes the navigable subset of checkout state across reloads.
///
/// Storage failures are logged and swallowed; losing the blob only costs
/// the shopper their wizard position, never the checkout itself.
#[derive(Clone)]
pub struct PersistenceBridge {
    store: Arc<dyn StateStore>,
}

impl PersistenceBridge {
    /// Creates a bridge over a persistent-scope store.
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// Writes the persisted subset of `state`.
    pub fn save(&self, state: &CheckoutState) {
        match serde_json::to_string(&state.persistable()) {
            Ok(json) => {
                if let Err(e) = self.store.put(CHECKOUT_STATE_KEY, &json) {
                    tracing::warn!(error = %e, "checkout state not persisted");
                }
            }
            Err(e) => tracing::warn!(error = %e, "checkout state not serializable"),
        }
    }

    /// Reads the persisted subset, if a parseable blob exists.
    pub fn restore(&self) -> Option<RestorePayload> {
        let json = match self.store.get(CHECKOUT_STATE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "persisted checkout state unreadable");
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::warn!(error = %e, "persisted checkout state corrupt; starting fresh");
                None
            }
        }
    }

    /// Deletes the persisted blob.
    pub fn discard(&self) {
        if let Err(e) = self.store.remove(CHECKOUT_STATE_KEY) {
            tracing::warn!(error = %e, "persisted checkout state not removed");
        }
    }
}
