//! Navigation seam.

use std::sync::{Arc, RwLock};

/// The two navigation side effects the checkout core performs: mirroring
/// the wizard step into the location fragment, and full-page redirects at
/// the end of the order pipeline.
pub trait Navigator: Send + Sync {
    /// Replaces the location fragment (without the leading `#`).
    fn set_fragment(&self, anchor: &str);

    /// Navigates the page to a new URL.
    fn redirect(&self, url: &str);
}

#[derive(Debug, Default)]
struct RecordingState {
    fragments: Vec<String>,
    redirects: Vec<String>,
}

/// Navigator that records calls instead of performing them.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    state: Arc<RwLock<RecordingState>>,
}

impl RecordingNavigator {
    /// Creates a new recording navigator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recent fragment set, if any.
    pub fn last_fragment(&self) -> Option<String> {
        self.state.read().unwrap().fragments.last().cloned()
    }

    /// Returns every redirect performed, oldest first.
    pub fn redirects(&self) -> Vec<String> {
        self.state.read().unwrap().redirects.clone()
    }

    /// Returns the most recent redirect, if any.
    pub fn last_redirect(&self) -> Option<String> {
        self.state.read().unwrap().redirects.last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn set_fragment(&self, anchor: &str) {
        self.state.write().unwrap().fragments.push(anchor.to_string());
    }

    fn redirect(&self, url: &str) {
        self.state.write().unwrap().redirects.push(url.to_string());
    }
}
