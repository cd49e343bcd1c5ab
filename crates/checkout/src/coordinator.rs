//! Checkout coordinator.
//!
//! Public operation surface for the three-step wizard: step sequencing,
//! shipping submission, payment selection, order submission with retry,
//! and error dismissal. The coordinator owns the state store and calls out
//! to the external collaborators; results feed back in through dispatch.

use std::sync::Arc;

use chrono::Utc;
use domain::{
    Address, CheckoutAction, CheckoutState, CheckoutStep, OrderPayload, PaymentKind,
    PaymentMethod, SupportEmail,
};

use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, Result};
use crate::services::tax::TaxService;
use crate::services::{CartStore, Navigator, OrderGateway, RateService};
use crate::store::CheckoutStore;
use crate::tax::TaxCoordinator;

/// Route the shopper lands on after a successful COD order.
const SUCCESS_ROUTE: &str = "/payment/success";

/// Orchestrates the checkout wizard against its collaborators.
///
/// Views call the public operations; all state changes flow through the
/// owned [`CheckoutStore`]. `is_processing` gates the Review step's submit
/// control, so the pipeline never runs two submissions concurrently.
pub struct CheckoutCoordinator<G, R, C, N>
where
    G: OrderGateway,
    R: RateService,
    C: CartStore,
    N: Navigator,
{
    store: Arc<CheckoutStore>,
    gateway: G,
    rates: R,
    cart: C,
    navigator: N,
    tax: TaxCoordinator,
    config: CheckoutConfig,
}

impl<G, R, C, N> CheckoutCoordinator<G, R, C, N>
where
    G: OrderGateway,
    R: RateService,
    C: CartStore,
    N: Navigator,
{
    /// Creates a new coordinator.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<CheckoutStore>,
        gateway: G,
        rates: R,
        cart: C,
        navigator: N,
        remote_tax: Arc<dyn TaxService>,
        fallback_tax: Arc<dyn TaxService>,
        config: CheckoutConfig,
    ) -> Self {
        let tax = TaxCoordinator::new(remote_tax, fallback_tax, config.tax_debounce);
        Self {
            store,
            gateway,
            rates,
            cart,
            navigator,
            tax,
            config,
        }
    }

    /// Returns the owned state store.
    pub fn store(&self) -> &Arc<CheckoutStore> {
        &self.store
    }

    /// Returns a snapshot of the current checkout state.
    pub fn state(&self) -> CheckoutState {
        self.store.snapshot()
    }

    // Step sequencer

    /// Moves the wizard to `step` and mirrors it into the location fragment.
    pub fn move_to_step(&self, step: CheckoutStep) {
        self.store.dispatch(CheckoutAction::SetStep(step));
        self.navigator.set_fragment(step.anchor());
    }

    /// Advances one step; no-op at Review.
    pub fn next_step(&self) {
        let current = self.store.read(|s| s.current_step());
        let next = current.next();
        if next != current {
            self.move_to_step(next);
        }
    }

    /// Retreats one step; no-op at Shipping.
    pub fn previous_step(&self) {
        let current = self.store.read(|s| s.current_step());
        let previous = current.previous();
        if previous != current {
            self.move_to_step(previous);
        }
    }

    // Shipping step

    /// Submits the shipping step: quotes shipping for the address, records
    /// everything on success, and advances to Payment.
    ///
    /// The address is only captured when the quote succeeds; a failed
    /// lookup leaves the step and state untouched apart from the error.
    #[tracing::instrument(skip(self, address, billing), fields(pincode = %address.postal_code))]
    pub async fn submit_shipping(
        &self,
        address: Address,
        billing: Option<Address>,
        same_as_billing: bool,
    ) -> Result<()> {
        self.store.dispatch(CheckoutAction::clear_error());
        self.store.dispatch(CheckoutAction::SetProcessing(true));
        let result = self
            .capture_shipping(address, billing, same_as_billing)
            .await;
        self.store.dispatch(CheckoutAction::SetProcessing(false));

        if let Err(e) = &result {
            self.record_failure(e);
        }
        result
    }

    async fn capture_shipping(
        &self,
        address: Address,
        billing: Option<Address>,
        same_as_billing: bool,
    ) -> Result<()> {
        let quote = self.rates.quote(&address.postal_code).await?;

        self.store
            .dispatch(CheckoutAction::SetShippingAddress(address));
        self.store
            .dispatch(CheckoutAction::SetSameAsBilling(same_as_billing));
        if !same_as_billing {
            self.store
                .dispatch(CheckoutAction::SetBillingAddress(billing));
        }
        self.store
            .dispatch(CheckoutAction::SetShippingCost(quote.shipping_cost));
        self.store
            .dispatch(CheckoutAction::SetEstimatedDelivery(quote.estimated_delivery));

        self.tax.sync(&self.store, self.cart.items());
        self.next_step();
        Ok(())
    }

    // Payment step

    /// Records the selected payment method without advancing.
    pub fn select_payment_method(&self, method: PaymentMethod) {
        self.store
            .dispatch(CheckoutAction::SetPaymentMethod(method));
    }

    /// Submits the payment step: requires a selected method, then advances
    /// to Review.
    pub fn submit_payment_step(&self) -> Result<()> {
        if self.store.read(|s| s.selected_payment_method().is_none()) {
            let error = CheckoutError::MissingPaymentMethod;
            self.record_failure(&error);
            return Err(error);
        }
        self.next_step();
        Ok(())
    }

    // Cart coupling

    /// Called by the host when cart contents change, so tax can follow.
    pub fn notify_cart_changed(&self) {
        self.tax.sync(&self.store, self.cart.items());
    }

    // Order submission pipeline

    /// Submits the order.
    #[tracing::instrument(skip(self))]
    pub async fn submit_order(&self) -> Result<()> {
        self.run_submission(0).await
    }

    /// Re-runs the submission pipeline, refusing once the retry cap for the
    /// current error episode is reached.
    #[tracing::instrument(skip(self))]
    pub async fn retry_order(&self) -> Result<()> {
        let attempts = self.store.read(|s| s.retry_count());
        if attempts >= self.config.max_order_retries {
            let error = CheckoutError::RetriesExhausted;
            self.record_failure(&error);
            return Err(error);
        }
        self.run_submission(attempts + 1).await
    }

    async fn run_submission(&self, attempt: u32) -> Result<()> {
        // Preconditions fail before the pipeline touches any state.
        let snapshot = self.store.snapshot();
        let Some(shipping) = snapshot.shipping_address().cloned() else {
            let error = CheckoutError::MissingShippingAddress;
            self.record_failure(&error);
            return Err(error);
        };
        let Some(method) = snapshot.selected_payment_method().cloned() else {
            let error = CheckoutError::MissingPaymentMethod;
            self.record_failure(&error);
            return Err(error);
        };

        metrics::counter!("order_submissions_total").increment(1);
        let started = std::time::Instant::now();

        self.store.dispatch(CheckoutAction::clear_error());
        if attempt > 0 {
            // Re-applied after the clear above so the episode's attempt
            // count survives into the failure handler.
            self.store.dispatch(CheckoutAction::SetRetryCount(attempt));
        }
        self.store.dispatch(CheckoutAction::SetProcessing(true));

        let result = self.place_order(&snapshot, shipping, method).await;

        self.store.dispatch(CheckoutAction::SetProcessing(false));
        metrics::histogram!("order_submission_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        if let Err(e) = &result {
            self.record_failure(e);
        }
        result
    }

    async fn place_order(
        &self,
        snapshot: &CheckoutState,
        shipping: Address,
        method: PaymentMethod,
    ) -> Result<()> {
        let billing = if snapshot.same_as_billing() {
            None
        } else {
            snapshot.billing_address().cloned()
        };
        let payload = OrderPayload::assemble(
            shipping,
            billing,
            method.id.clone(),
            self.cart.items(),
            snapshot.shipping_cost(),
        );

        let receipt = self.gateway.create_order(&payload).await?;
        self.store
            .dispatch(CheckoutAction::SetOrderData(receipt.clone()));

        match method.kind {
            PaymentKind::Cod => {
                self.cart.clear();
                self.store.discard_persisted();
                self.navigator.redirect(&format!(
                    "{SUCCESS_ROUTE}?order_id={}",
                    receipt.order_number
                ));
                metrics::counter!("orders_placed_total", "method" => "cod").increment(1);
                tracing::info!(order = %receipt.order_number, "order placed, cash on delivery");
            }
            PaymentKind::Online => {
                let Some(url) = receipt.payment_url else {
                    return Err(CheckoutError::MissingPaymentUrl);
                };
                metrics::counter!("orders_placed_total", "method" => "online").increment(1);
                tracing::info!(order = %receipt.order_number, "order placed, redirecting to gateway");
                self.navigator.redirect(&url);
            }
        }
        Ok(())
    }

    // Error surface

    /// Dismisses the current error, ending the retry episode.
    pub fn dismiss_error(&self) {
        self.store.dispatch(CheckoutAction::clear_error());
    }

    /// Pre-fills a support email for the current error, if one is set.
    pub fn support_email(&self) -> Option<SupportEmail> {
        let snapshot = self.store.snapshot();
        let message = snapshot.error()?;
        let kind = snapshot.error_kind().unwrap_or(domain::ErrorKind::General);
        let order_ref = snapshot.order_data().map(|o| o.order_number.as_str());
        Some(SupportEmail::compose(message, kind, order_ref, Utc::now()))
    }

    /// Tears the checkout attempt down when the shopper leaves the route.
    pub fn teardown(&self) {
        self.store.discard_persisted();
    }

    fn record_failure(&self, error: &CheckoutError) {
        let kind = error.kind();
        metrics::counter!("checkout_failures_total", "kind" => kind.as_str()).increment(1);
        tracing::warn!(
            %error,
            kind = %kind,
            suggestion = kind.suggested_action(),
            "checkout operation failed"
        );
        self.store
            .dispatch(CheckoutAction::error(error.to_string(), kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::services::{
        InMemoryCartStore, InMemoryOrderGateway, InMemoryRateService, InMemoryTaxService,
        LocalTaxEstimator, RecordingNavigator,
    };
    use common::{CartItem, Money};
    use domain::ErrorKind;

    type TestCoordinator = CheckoutCoordinator<
        InMemoryOrderGateway,
        InMemoryRateService,
        InMemoryCartStore,
        RecordingNavigator,
    >;

    struct Fixture {
        coordinator: TestCoordinator,
        gateway: InMemoryOrderGateway,
        rates: InMemoryRateService,
        cart: InMemoryCartStore,
        navigator: RecordingNavigator,
    }

    fn setup() -> Fixture {
        let gateway = InMemoryOrderGateway::new();
        let rates = InMemoryRateService::new();
        let cart = InMemoryCartStore::with_items(vec![CartItem::new(
            "BK-001",
            "The Rust Book",
            Money::from_rupees(500),
            2,
        )]);
        let navigator = RecordingNavigator::new();

        let coordinator = CheckoutCoordinator::new(
            Arc::new(CheckoutStore::new()),
            gateway.clone(),
            rates.clone(),
            cart.clone(),
            navigator.clone(),
            Arc::new(InMemoryTaxService::new()),
            Arc::new(LocalTaxEstimator::new()),
            CheckoutConfig::default(),
        );

        Fixture {
            coordinator,
            gateway,
            rates,
            cart,
            navigator,
        }
    }

    fn address() -> Address {
        Address {
            first_name: "Asha".into(),
            last_name: "Kulkarni".into(),
            phone: "9820012345".into(),
            address_line_1: "14 Hill Road".into(),
            city: "Mumbai".into(),
            state: "Maharashtra".into(),
            postal_code: "400001".into(),
            country: "IN".into(),
            email: "asha@example.com".into(),
        }
    }

    async fn reach_review(fixture: &Fixture) {
        fixture
            .coordinator
            .submit_shipping(address(), None, true)
            .await
            .unwrap();
        fixture
            .coordinator
            .select_payment_method(PaymentMethod::cod("cod", "Cash on Delivery"));
        fixture.coordinator.submit_payment_step().unwrap();
    }

    #[tokio::test]
    async fn test_sequencer_mirrors_fragment() {
        let fixture = setup();
        let coordinator = &fixture.coordinator;

        coordinator.move_to_step(CheckoutStep::Payment);
        assert_eq!(coordinator.state().current_step(), CheckoutStep::Payment);
        assert_eq!(fixture.navigator.last_fragment().as_deref(), Some("payment"));

        coordinator.next_step();
        assert_eq!(coordinator.state().current_step(), CheckoutStep::Review);
        assert_eq!(fixture.navigator.last_fragment().as_deref(), Some("review"));

        // Saturates at Review.
        coordinator.next_step();
        assert_eq!(coordinator.state().current_step(), CheckoutStep::Review);

        coordinator.previous_step();
        coordinator.previous_step();
        assert_eq!(coordinator.state().current_step(), CheckoutStep::Shipping);

        // Saturates at Shipping.
        coordinator.previous_step();
        assert_eq!(coordinator.state().current_step(), CheckoutStep::Shipping);
    }

    #[tokio::test]
    async fn test_submit_shipping_captures_and_advances() {
        let fixture = setup();
        fixture
            .coordinator
            .submit_shipping(address(), None, true)
            .await
            .unwrap();

        let state = fixture.coordinator.state();
        assert_eq!(state.current_step(), CheckoutStep::Payment);
        assert_eq!(state.shipping_address().unwrap().postal_code, "400001");
        assert_eq!(state.shipping_cost(), Money::from_rupees(50));
        assert_eq!(state.estimated_delivery(), "3-5 business days");
        assert!(!state.is_processing());
        assert_eq!(fixture.rates.quote_count(), 1);
        assert_eq!(fixture.navigator.last_fragment().as_deref(), Some("payment"));
    }

    #[tokio::test]
    async fn test_submit_shipping_failure_leaves_step_and_address() {
        let fixture = setup();
        fixture.rates.set_fail_on_quote(true);

        let err = fixture
            .coordinator
            .submit_shipping(address(), None, true)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Service(_)));

        let state = fixture.coordinator.state();
        assert_eq!(state.current_step(), CheckoutStep::Shipping);
        assert!(state.shipping_address().is_none());
        assert_eq!(state.error_kind(), Some(ErrorKind::Shipping));
        assert!(!state.is_processing());
    }

    #[tokio::test]
    async fn test_billing_address_kept_when_different() {
        let fixture = setup();
        let mut billing = address();
        billing.city = "Pune".into();
        billing.postal_code = "411001".into();

        fixture
            .coordinator
            .submit_shipping(address(), Some(billing.clone()), false)
            .await
            .unwrap();

        let state = fixture.coordinator.state();
        assert!(!state.same_as_billing());
        assert_eq!(state.billing_address(), Some(&billing));
    }

    #[tokio::test]
    async fn test_submit_payment_step_requires_method() {
        let fixture = setup();
        fixture
            .coordinator
            .submit_shipping(address(), None, true)
            .await
            .unwrap();

        let err = fixture.coordinator.submit_payment_step().unwrap_err();
        assert!(matches!(err, CheckoutError::MissingPaymentMethod));
        assert_eq!(
            fixture.coordinator.state().error_kind(),
            Some(ErrorKind::Validation)
        );
        assert_eq!(
            fixture.coordinator.state().current_step(),
            CheckoutStep::Payment
        );

        fixture
            .coordinator
            .select_payment_method(PaymentMethod::cod("cod", "Cash on Delivery"));
        fixture.coordinator.submit_payment_step().unwrap();
        assert_eq!(
            fixture.coordinator.state().current_step(),
            CheckoutStep::Review
        );
    }

    #[tokio::test]
    async fn test_cod_order_clears_cart_and_redirects() {
        let fixture = setup();
        reach_review(&fixture).await;

        fixture.coordinator.submit_order().await.unwrap();

        assert!(fixture.cart.is_empty());
        assert_eq!(fixture.cart.clear_calls(), 1);
        assert_eq!(
            fixture.navigator.redirects(),
            vec!["/payment/success?order_id=ORD-0001".to_string()]
        );

        let state = fixture.coordinator.state();
        assert_eq!(state.order_data().unwrap().order_number, "ORD-0001");
        assert!(state.error().is_none());
        assert!(!state.is_processing());
    }

    #[tokio::test]
    async fn test_cod_payload_totals() {
        let fixture = setup();
        reach_review(&fixture).await;

        fixture.coordinator.submit_order().await.unwrap();

        let payload = fixture.gateway.last_order().unwrap();
        assert_eq!(payload.subtotal, Money::from_rupees(1000));
        assert_eq!(payload.shipping_cost, Money::from_rupees(50));
        assert_eq!(payload.total_amount, Money::from_rupees(1050));
        assert_eq!(payload.payment_method, "cod");
        assert!(payload.billing_address.is_none());
        assert_eq!(payload.items.len(), 1);
    }

    #[tokio::test]
    async fn test_online_order_redirects_to_gateway() {
        let fixture = setup();
        fixture
            .gateway
            .set_payment_url("https://pay.example.com/session/42");
        fixture
            .coordinator
            .submit_shipping(address(), None, true)
            .await
            .unwrap();
        fixture
            .coordinator
            .select_payment_method(PaymentMethod::online("razorpay", "Razorpay"));
        fixture.coordinator.submit_payment_step().unwrap();

        fixture.coordinator.submit_order().await.unwrap();

        assert_eq!(
            fixture.navigator.last_redirect().as_deref(),
            Some("https://pay.example.com/session/42")
        );
        // The cart is only cleared for COD; online orders settle after the
        // gateway confirms.
        assert!(!fixture.cart.is_empty());
    }

    #[tokio::test]
    async fn test_online_order_without_payment_url_fails() {
        let fixture = setup();
        fixture
            .coordinator
            .submit_shipping(address(), None, true)
            .await
            .unwrap();
        fixture
            .coordinator
            .select_payment_method(PaymentMethod::online("razorpay", "Razorpay"));
        fixture.coordinator.submit_payment_step().unwrap();

        let err = fixture.coordinator.submit_order().await.unwrap_err();
        assert!(matches!(err, CheckoutError::MissingPaymentUrl));

        let state = fixture.coordinator.state();
        assert_eq!(state.error(), Some("Payment URL not received"));
        assert_eq!(state.error_kind(), Some(ErrorKind::Payment));
        assert!(fixture.navigator.redirects().is_empty());
    }

    #[tokio::test]
    async fn test_missing_address_fails_without_gateway_call() {
        let fixture = setup();
        fixture
            .coordinator
            .select_payment_method(PaymentMethod::cod("cod", "Cash on Delivery"));

        let err = fixture.coordinator.submit_order().await.unwrap_err();
        assert!(matches!(err, CheckoutError::MissingShippingAddress));
        assert_eq!(
            fixture.coordinator.state().error_kind(),
            Some(ErrorKind::Validation)
        );
        assert_eq!(fixture.gateway.order_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_method_fails_without_gateway_call() {
        let fixture = setup();
        fixture
            .coordinator
            .submit_shipping(address(), None, true)
            .await
            .unwrap();

        let err = fixture.coordinator.submit_order().await.unwrap_err();
        assert!(matches!(err, CheckoutError::MissingPaymentMethod));
        assert_eq!(fixture.gateway.order_count(), 0);
    }

    #[tokio::test]
    async fn test_402_status_classifies_as_payment() {
        let fixture = setup();
        reach_review(&fixture).await;
        fixture
            .gateway
            .set_fail_with(ServiceError::http(402, "request rejected"));

        fixture.coordinator.submit_order().await.unwrap_err();
        assert_eq!(
            fixture.coordinator.state().error_kind(),
            Some(ErrorKind::Payment)
        );
    }

    #[tokio::test]
    async fn test_out_of_stock_message_classifies_as_inventory() {
        let fixture = setup();
        reach_review(&fixture).await;
        fixture
            .gateway
            .set_fail_with(ServiceError::new("item is out of stock"));

        fixture.coordinator.submit_order().await.unwrap_err();
        assert_eq!(
            fixture.coordinator.state().error_kind(),
            Some(ErrorKind::Inventory)
        );
    }

    #[tokio::test]
    async fn test_retry_cap() {
        let fixture = setup();
        reach_review(&fixture).await;
        fixture
            .gateway
            .set_fail_with(ServiceError::http(503, "gateway overloaded"));

        fixture.coordinator.submit_order().await.unwrap_err();
        assert_eq!(fixture.coordinator.state().retry_count(), 0);

        for expected in 1..=3 {
            fixture.coordinator.retry_order().await.unwrap_err();
            assert_eq!(fixture.coordinator.state().retry_count(), expected);
        }
        assert_eq!(fixture.gateway.create_calls(), 4);

        // Fourth retry short-circuits: terminal error, no gateway call.
        let err = fixture.coordinator.retry_order().await.unwrap_err();
        assert!(matches!(err, CheckoutError::RetriesExhausted));
        let state = fixture.coordinator.state();
        assert!(state.error().unwrap().contains("maximum retry attempts"));
        assert_eq!(state.retry_count(), 3);
        assert_eq!(fixture.gateway.create_calls(), 4);
    }

    #[tokio::test]
    async fn test_retry_succeeds_once_gateway_recovers() {
        let fixture = setup();
        reach_review(&fixture).await;
        fixture
            .gateway
            .set_fail_with(ServiceError::new("connection timeout"));

        fixture.coordinator.submit_order().await.unwrap_err();
        assert_eq!(
            fixture.coordinator.state().error_kind(),
            Some(ErrorKind::Network)
        );

        fixture.gateway.clear_failure();
        fixture.coordinator.retry_order().await.unwrap();
        assert!(fixture.coordinator.state().error().is_none());
        assert_eq!(fixture.gateway.order_count(), 1);
    }

    #[tokio::test]
    async fn test_dismiss_error_ends_episode() {
        let fixture = setup();
        reach_review(&fixture).await;
        fixture
            .gateway
            .set_fail_with(ServiceError::new("boom"));

        fixture.coordinator.submit_order().await.unwrap_err();
        fixture.coordinator.retry_order().await.unwrap_err();
        assert_eq!(fixture.coordinator.state().retry_count(), 1);

        fixture.coordinator.dismiss_error();
        let state = fixture.coordinator.state();
        assert!(state.error().is_none());
        assert_eq!(state.retry_count(), 0);
    }

    #[tokio::test]
    async fn test_support_email_for_current_error() {
        let fixture = setup();
        assert!(fixture.coordinator.support_email().is_none());

        reach_review(&fixture).await;
        fixture
            .gateway
            .set_fail_with(ServiceError::http(402, "card declined"));
        fixture.coordinator.submit_order().await.unwrap_err();

        let email = fixture.coordinator.support_email().unwrap();
        assert!(email.body.contains("card declined"));
        assert!(email.body.contains("Category: payment"));
    }
}
