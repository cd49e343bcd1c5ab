//! Behavioral telemetry sampler.
//!
//! Best-effort engagement reporting, deliberately isolated from the
//! transactional core: the sampler reads nothing from checkout state, and
//! a failing sink can only ever produce a debug log line.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use state_store::StateStore;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::services::behavior::BehaviorSink;

/// Session-scoped storage key for the behavior session identifier.
pub const SESSION_ID_KEY: &str = "checkout_session_id";

/// Device class derived from the viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    /// Classifies a viewport width in CSS pixels.
    pub fn from_viewport_width(width: u32) -> Self {
        if width < 768 {
            DeviceClass::Mobile
        } else if width < 1024 {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }

    /// Returns the wire name of the class.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Mobile => "mobile",
            DeviceClass::Tablet => "tablet",
            DeviceClass::Desktop => "desktop",
        }
    }
}

/// One engagement sample as posted to the analytics endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorSample {
    pub session_id: String,
    pub device_type: DeviceClass,
    /// Maximum scroll depth percentage observed so far.
    pub scroll_depth: u8,
    /// Seconds since checkout entry.
    pub session_duration: u64,
    /// Seconds since the last recorded activity.
    pub time_on_page: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_intent_detected: Option<bool>,
}

/// Shared engagement signals the host view feeds as the user interacts.
#[derive(Debug)]
pub struct ActivitySignals {
    scroll_depth: AtomicU8,
    viewport_width: AtomicU32,
    exit_intent_seen: AtomicBool,
    last_activity: Mutex<Instant>,
}

impl ActivitySignals {
    fn new() -> Self {
        Self {
            scroll_depth: AtomicU8::new(0),
            viewport_width: AtomicU32::new(1280),
            exit_intent_seen: AtomicBool::new(false),
            last_activity: Mutex::new(Instant::now()),
        }
    }

    /// Records a scroll position; only the maximum depth is kept.
    pub fn record_scroll(&self, depth_percent: u8) {
        self.scroll_depth
            .fetch_max(depth_percent.min(100), Ordering::Relaxed);
    }

    /// Records the current viewport width.
    pub fn set_viewport_width(&self, width: u32) {
        self.viewport_width.store(width, Ordering::Relaxed);
    }

    /// Records user activity, resetting the idle clock.
    pub async fn record_activity(&self) {
        *self.last_activity.lock().await = Instant::now();
    }

    /// Returns the device class for the current viewport.
    pub fn device_class(&self) -> DeviceClass {
        DeviceClass::from_viewport_width(self.viewport_width.load(Ordering::Relaxed))
    }
}

/// Samples engagement signals on a timer and on page-exit events.
///
/// Cadence: one sample at start, one per interval tick, one at shutdown.
/// Exit-intent and visibility-loss each emit an immediate extra sample.
/// The interval task is aborted on shutdown and on drop.
pub struct BehaviorSampler {
    signals: Arc<ActivitySignals>,
    sink: Arc<dyn BehaviorSink>,
    session_id: String,
    started: Instant,
    ticker: Option<JoinHandle<()>>,
}

impl BehaviorSampler {
    /// Starts sampling: emits the mount sample and spawns the interval task.
    ///
    /// The session identifier is read from (or created in) session-scoped
    /// storage, so reloads within the tab keep one identifier.
    pub async fn start(
        sink: Arc<dyn BehaviorSink>,
        session_store: &dyn StateStore,
        interval: Duration,
    ) -> Self {
        let session_id = session_id_for(session_store);
        let signals = Arc::new(ActivitySignals::new());
        let started = Instant::now();

        // Mount sample.
        let sample = build_sample(&signals, &session_id, started, None).await;
        send(&sink, sample);

        let ticker = {
            let signals = signals.clone();
            let sink = sink.clone();
            let session_id = session_id.clone();
            tokio::spawn(async move {
                let mut ticks = tokio::time::interval_at(started + interval, interval);
                loop {
                    ticks.tick().await;
                    let sample = build_sample(&signals, &session_id, started, None).await;
                    send(&sink, sample);
                }
            })
        };

        Self {
            signals,
            sink,
            session_id,
            started,
            ticker: Some(ticker),
        }
    }

    /// Returns the shared signals handle the host view feeds.
    pub fn signals(&self) -> Arc<ActivitySignals> {
        self.signals.clone()
    }

    /// Returns the session identifier used for every sample.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Records an exit-intent event and emits an immediate sample.
    pub async fn note_exit_intent(&self) {
        self.signals.exit_intent_seen.store(true, Ordering::Relaxed);
        self.emit(Some(true)).await;
    }

    /// Records a tab/page visibility loss and emits an immediate sample.
    pub async fn note_visibility_lost(&self) {
        self.emit(None).await;
    }

    /// Emits the final sample and stops the interval task.
    pub async fn shutdown(mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        let sample = build_sample(&self.signals, &self.session_id, self.started, None).await;
        if let Err(e) = self.sink.record(sample).await {
            tracing::debug!(error = %e, "final behavior sample dropped");
        }
    }

    async fn emit(&self, exit_intent: Option<bool>) {
        let sample = build_sample(&self.signals, &self.session_id, self.started, exit_intent).await;
        send(&self.sink, sample);
    }
}

impl Drop for BehaviorSampler {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

async fn build_sample(
    signals: &ActivitySignals,
    session_id: &str,
    started: Instant,
    exit_intent: Option<bool>,
) -> BehaviorSample {
    let last_activity = *signals.last_activity.lock().await;
    let exit_intent_detected = match exit_intent {
        Some(true) => Some(true),
        _ => signals
            .exit_intent_seen
            .load(Ordering::Relaxed)
            .then_some(true),
    };

    BehaviorSample {
        session_id: session_id.to_string(),
        device_type: signals.device_class(),
        scroll_depth: signals.scroll_depth.load(Ordering::Relaxed),
        session_duration: started.elapsed().as_secs(),
        time_on_page: last_activity.elapsed().as_secs(),
        exit_intent_detected,
    }
}

/// Fire-and-forget send; sink failures never reach the caller.
fn send(sink: &Arc<dyn BehaviorSink>, sample: BehaviorSample) {
    let sink = sink.clone();
    tokio::spawn(async move {
        if let Err(e) = sink.record(sample).await {
            tracing::debug!(error = %e, "behavior sample dropped");
        }
    });
}

fn session_id_for(store: &dyn StateStore) -> String {
    match store.get(SESSION_ID_KEY) {
        Ok(Some(existing)) => existing,
        Ok(None) => {
            let id = format!(
                "session_{}_{}",
                chrono::Utc::now().timestamp_millis(),
                &uuid::Uuid::new_v4().simple().to_string()[..12]
            );
            if let Err(e) = store.put(SESSION_ID_KEY, &id) {
                tracing::debug!(error = %e, "session id not persisted");
            }
            id
        }
        Err(e) => {
            tracing::debug!(error = %e, "session storage unavailable");
            format!(
                "session_{}_{}",
                chrono::Utc::now().timestamp_millis(),
                &uuid::Uuid::new_v4().simple().to_string()[..12]
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::behavior::InMemoryBehaviorSink;
    use state_store::InMemoryStateStore;

    #[test]
    fn test_device_class_thresholds() {
        assert_eq!(DeviceClass::from_viewport_width(320), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_viewport_width(767), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_viewport_width(768), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_viewport_width(1023), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_viewport_width(1024), DeviceClass::Desktop);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sampling_cadence() {
        let sink = Arc::new(InMemoryBehaviorSink::new());
        let session_store = InMemoryStateStore::new();

        let sampler = BehaviorSampler::start(
            sink.clone(),
            &session_store,
            Duration::from_secs(30),
        )
        .await;

        // Mount sample.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(sink.sample_count(), 1);

        // Three interval ticks in 95 seconds.
        tokio::time::sleep(Duration::from_secs(95)).await;
        assert_eq!(sink.sample_count(), 4);

        // Teardown sample.
        sampler.shutdown().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(sink.sample_count(), 5);

        // No further ticks after shutdown.
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(sink.sample_count(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exit_intent_sample() {
        let sink = Arc::new(InMemoryBehaviorSink::new());
        let session_store = InMemoryStateStore::new();

        let sampler = BehaviorSampler::start(
            sink.clone(),
            &session_store,
            Duration::from_secs(30),
        )
        .await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        let mount = sink.samples()[0].clone();
        assert!(mount.exit_intent_detected.is_none());

        sampler.note_exit_intent().await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        let samples = sink.samples();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].exit_intent_detected, Some(true));
        drop(sampler);
    }

    #[tokio::test(start_paused = true)]
    async fn test_signals_feed_samples() {
        let sink = Arc::new(InMemoryBehaviorSink::new());
        let session_store = InMemoryStateStore::new();

        let sampler = BehaviorSampler::start(
            sink.clone(),
            &session_store,
            Duration::from_secs(30),
        )
        .await;
        let signals = sampler.signals();
        signals.set_viewport_width(375);
        signals.record_scroll(40);
        signals.record_scroll(80);
        signals.record_scroll(60);

        tokio::time::sleep(Duration::from_secs(31)).await;
        let sample = sink.samples().last().cloned().unwrap();
        assert_eq!(sample.device_type, DeviceClass::Mobile);
        assert_eq!(sample.scroll_depth, 80);
        assert_eq!(sample.session_duration, 30);
        drop(sampler);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_id_reused_within_tab() {
        let sink = Arc::new(InMemoryBehaviorSink::new());
        let session_store = InMemoryStateStore::new();

        let first = BehaviorSampler::start(
            sink.clone(),
            &session_store,
            Duration::from_secs(30),
        )
        .await;
        let id = first.session_id().to_string();
        assert!(id.starts_with("session_"));
        first.shutdown().await;

        let second =
            BehaviorSampler::start(sink, &session_store, Duration::from_secs(30)).await;
        assert_eq!(second.session_id(), id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sink_failures_are_swallowed() {
        let sink = Arc::new(InMemoryBehaviorSink::new());
        sink.set_fail_on_record(true);
        let session_store = InMemoryStateStore::new();

        let sampler = BehaviorSampler::start(
            sink.clone(),
            &session_store,
            Duration::from_secs(30),
        )
        .await;
        tokio::time::sleep(Duration::from_secs(31)).await;
        sampler.shutdown().await;

        assert_eq!(sink.sample_count(), 0);
    }
}
