//! Reactive tax recomputation.
//!
//! Watches the inputs tax depends on (destination state and pincode, cart
//! item count, shipping cost) and recomputes through the remote service
//! with a debounce, falling back to the offline estimator when the remote
//! call fails. Tax failure never blocks step progression.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{CartItem, Money};
use domain::{CheckoutAction, TaxRequest};
use tokio::task::JoinHandle;

use crate::services::tax::TaxService;
use crate::store::CheckoutStore;

/// The snapshot of inputs a recomputation is keyed on; a change in any
/// field qualifies as a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TriggerKey {
    state: String,
    pincode: String,
    item_count: usize,
    shipping_cost: Money,
}

/// Debounced tax recomputation over the remote service with offline
/// fallback.
///
/// A newer trigger aborts the pending debounce timer, and every write back
/// into state is gated on a generation counter so a superseded in-flight
/// request can never overwrite a fresher result.
pub struct TaxCoordinator {
    remote: Arc<dyn TaxService>,
    fallback: Arc<dyn TaxService>,
    debounce: Duration,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
    last_trigger: Mutex<Option<TriggerKey>>,
}

impl TaxCoordinator {
    /// Creates a coordinator over a remote service and its offline fallback.
    pub fn new(
        remote: Arc<dyn TaxService>,
        fallback: Arc<dyn TaxService>,
        debounce: Duration,
    ) -> Self {
        Self {
            remote,
            fallback,
            debounce,
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
            last_trigger: Mutex::new(None),
        }
    }

    /// Called after any state or cart change that might affect tax.
    ///
    /// Schedules a debounced recomputation when the trigger inputs changed
    /// since the last scheduling, a shipping address exists, and the cart
    /// is non-empty.
    pub fn sync(&self, store: &Arc<CheckoutStore>, items: Vec<CartItem>) {
        let snapshot = store.snapshot();
        let Some(address) = snapshot.shipping_address() else {
            return;
        };
        if items.is_empty() {
            return;
        }

        let key = TriggerKey {
            state: address.state.clone(),
            pincode: address.postal_code.clone(),
            item_count: items.len(),
            shipping_cost: snapshot.shipping_cost(),
        };
        {
            let mut last = self.last_trigger.lock().unwrap();
            if last.as_ref() == Some(&key) {
                return;
            }
            *last = Some(key);
        }

        let request = TaxRequest::from_cart(items, snapshot.shipping_cost(), address);
        self.schedule(store.clone(), request);
    }

    fn schedule(&self, store: Arc<CheckoutStore>, request: TaxRequest) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let mut pending = self.pending.lock().unwrap();
        if let Some(stale) = pending.take() {
            stale.abort();
        }

        tracing::debug!(generation, pincode = %request.pincode, "tax recomputation scheduled");
        let remote = self.remote.clone();
        let fallback = self.fallback.clone();
        let debounce = self.debounce;
        let guard = self.generation.clone();
        *pending = Some(tokio::spawn(async move {
            run_calculation(store, remote, fallback, request, debounce, guard, generation).await;
        }));
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_calculation(
    store: Arc<CheckoutStore>,
    remote: Arc<dyn TaxService>,
    fallback: Arc<dyn TaxService>,
    request: TaxRequest,
    debounce: Duration,
    guard: Arc<AtomicU64>,
    generation: u64,
) {
    tokio::time::sleep(debounce).await;
    let fresh = || guard.load(Ordering::SeqCst) == generation;
    if !fresh() {
        return;
    }

    if let Err(e) = request.validate() {
        store.dispatch(CheckoutAction::SetTaxError(e.to_string()));
        return;
    }

    store.dispatch(CheckoutAction::SetCalculatingTax(true));
    let started = std::time::Instant::now();
    let result = remote.calculate(&request).await;
    metrics::histogram!("tax_calculation_duration_seconds").record(started.elapsed().as_secs_f64());

    match result {
        Ok(calculation) => {
            if fresh() {
                store.dispatch(CheckoutAction::SetTaxCalculation(calculation));
            }
        }
        Err(remote_error) => {
            tracing::warn!(error = %remote_error, "remote tax calculation failed, using offline estimate");
            metrics::counter!("tax_fallbacks_total").increment(1);

            match fallback.calculate(&request).await {
                Ok(estimate) => {
                    if fresh() {
                        // Non-blocking: the figure is shown but flagged as
                        // an estimate.
                        store.dispatch(CheckoutAction::SetTaxCalculation(estimate.as_estimate()));
                    }
                }
                Err(fallback_error) => {
                    tracing::warn!(error = %fallback_error, "offline tax estimate failed");
                    if fresh() {
                        store.dispatch(CheckoutAction::SetTaxError(
                            "Tax calculation is currently unavailable".to_string(),
                        ));
                    }
                }
            }
        }
    }
}

/// Test-only tax service that delays each response by a queued duration.
#[cfg(test)]
pub(crate) struct DelayedTaxService {
    inner: crate::services::tax::InMemoryTaxService,
    delays: Mutex<std::collections::VecDeque<Duration>>,
}

#[cfg(test)]
impl DelayedTaxService {
    pub(crate) fn new(inner: crate::services::tax::InMemoryTaxService) -> Self {
        Self {
            inner,
            delays: Mutex::new(std::collections::VecDeque::new()),
        }
    }

    pub(crate) fn push_delay(&self, delay: Duration) {
        self.delays.lock().unwrap().push_back(delay);
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl TaxService for DelayedTaxService {
    async fn calculate(
        &self,
        request: &TaxRequest,
    ) -> Result<domain::TaxCalculation, crate::error::ServiceError> {
        let delay = self.delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.calculate(request).await
    }
}
