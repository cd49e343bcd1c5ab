//! Behavior tracking sink trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::telemetry::BehaviorSample;

/// Trait for the analytics endpoint behavior samples are posted to.
#[async_trait]
pub trait BehaviorSink: Send + Sync {
    /// Records one engagement sample.
    async fn record(&self, sample: BehaviorSample) -> Result<(), ServiceError>;
}

#[derive(Debug, Default)]
struct InMemoryBehaviorState {
    samples: Vec<BehaviorSample>,
    fail_on_record: bool,
}

/// In-memory behavior sink for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBehaviorSink {
    state: Arc<RwLock<InMemoryBehaviorState>>,
}

impl InMemoryBehaviorSink {
    /// Creates a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the sink to fail record calls.
    pub fn set_fail_on_record(&self, fail: bool) {
        self.state.write().unwrap().fail_on_record = fail;
    }

    /// Returns the number of samples recorded.
    pub fn sample_count(&self) -> usize {
        self.state.read().unwrap().samples.len()
    }

    /// Returns every recorded sample, oldest first.
    pub fn samples(&self) -> Vec<BehaviorSample> {
        self.state.read().unwrap().samples.clone()
    }
}

#[async_trait]
impl BehaviorSink for InMemoryBehaviorSink {
    async fn record(&self, sample: BehaviorSample) -> Result<(), ServiceError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_record {
            return Err(ServiceError::new("analytics endpoint unavailable"));
        }

        state.samples.push(sample);
        Ok(())
    }
}
