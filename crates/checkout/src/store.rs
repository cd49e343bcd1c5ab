//! Dispatch surface over the checkout state aggregate.

use std::sync::RwLock;

use domain::{CheckoutAction, CheckoutState};

use crate::persistence::PersistenceBridge;

/// Owns the checkout state and funnels every mutation through the reducer.
///
/// When built with a persistence bridge, the persisted subset is merged
/// back on construction and re-saved after every dispatch.
pub struct CheckoutStore {
    state: RwLock<CheckoutState>,
    bridge: Option<PersistenceBridge>,
}

impl CheckoutStore {
    /// Creates a store with default state and no persistence.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CheckoutState::default()),
            bridge: None,
        }
    }

    /// Creates a store that restores from and saves to the bridge.
    pub fn with_persistence(bridge: PersistenceBridge) -> Self {
        let mut state = CheckoutState::default();
        if let Some(payload) = bridge.restore() {
            tracing::debug!("restoring persisted checkout state");
            state.apply(CheckoutAction::Restore(payload));
        }
        Self {
            state: RwLock::new(state),
            bridge: Some(bridge),
        }
    }

    /// Applies an action and persists the resulting state.
    pub fn dispatch(&self, action: CheckoutAction) {
        let mut state = self.state.write().unwrap();
        tracing::trace!(action = action.name(), "dispatch");
        state.apply(action);
        if let Some(bridge) = &self.bridge {
            bridge.save(&state);
        }
    }

    /// Returns a clone of the current state.
    pub fn snapshot(&self) -> CheckoutState {
        self.state.read().unwrap().clone()
    }

    /// Reads a value out of the current state without cloning all of it.
    pub fn read<R>(&self, f: impl FnOnce(&CheckoutState) -> R) -> R {
        f(&self.state.read().unwrap())
    }

    /// Deletes the persisted blob, if persistence is attached.
    pub fn discard_persisted(&self) {
        if let Some(bridge) = &self.bridge {
            bridge.discard();
        }
    }
}

impl Default for CheckoutStore {
    fn default() -> Self {
        Self::new()
    }
}
