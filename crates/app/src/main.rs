//! Demo entry point: walks one full checkout session against the
//! in-memory collaborators, with structured logs.

use std::sync::Arc;
use std::time::Duration;

use checkout::{BehaviorSampler, CheckoutConfig, CheckoutCoordinator, CheckoutStore};
use common::{CartItem, Money};
use domain::{Address, PaymentMethod};
use state_store::InMemoryStateStore;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CheckoutConfig::from_env();

    // 2. In-memory stand-ins for the storefront backend
    let storage = InMemoryStateStore::new();
    let session_storage = InMemoryStateStore::new();
    let cart = checkout::InMemoryCartStore::with_items(vec![
        CartItem::new("BK-4901", "The Rust Programming Language", Money::from_rupees(500), 2)
            .with_tax_category("books")
            .with_hsn_code("4901"),
        CartItem::new("ST-9608", "Fountain Pen", Money::from_rupees(200), 1)
            .with_tax_category("stationery")
            .with_hsn_code("9608"),
    ]);
    let gateway = checkout::InMemoryOrderGateway::new();
    let rates = checkout::InMemoryRateService::new();
    let navigator = checkout::RecordingNavigator::new();
    let sink = Arc::new(checkout::InMemoryBehaviorSink::new());

    // 3. Coordinator with persistence attached
    let store = Arc::new(CheckoutStore::with_persistence(
        checkout::PersistenceBridge::new(Arc::new(storage.clone())),
    ));
    let coordinator = CheckoutCoordinator::new(
        store,
        gateway,
        rates,
        cart.clone(),
        navigator.clone(),
        Arc::new(checkout::InMemoryTaxService::new()),
        Arc::new(checkout::LocalTaxEstimator::new()),
        config.clone(),
    );

    // 4. Behavior sampler, isolated from the transactional path
    let sampler =
        BehaviorSampler::start(sink.clone(), &session_storage, config.telemetry_interval).await;
    sampler.signals().set_viewport_width(1440);
    sampler.signals().record_scroll(35);

    // 5. Shipping step
    let address = Address {
        first_name: "Asha".into(),
        last_name: "Kulkarni".into(),
        phone: "9820012345".into(),
        address_line_1: "14 Hill Road".into(),
        city: "Mumbai".into(),
        state: "Maharashtra".into(),
        postal_code: "400001".into(),
        country: "IN".into(),
        email: "asha@example.com".into(),
    };
    coordinator
        .submit_shipping(address, None, true)
        .await
        .expect("shipping step failed");

    let state = coordinator.state();
    tracing::info!(
        shipping_cost = %state.shipping_cost(),
        estimate = state.estimated_delivery(),
        "shipping captured"
    );

    // 6. Wait out the tax debounce and show the breakdown
    tokio::time::sleep(config.tax_debounce + Duration::from_millis(200)).await;
    if let Some(tax) = coordinator.state().tax_calculation() {
        tracing::info!(
            taxable = %tax.summary.taxable_amount,
            total_tax = %tax.summary.total_tax,
            grand_total = %tax.summary.grand_total,
            estimated = tax.estimated,
            "tax calculated"
        );
    }

    // 7. Payment and review
    coordinator.select_payment_method(PaymentMethod::cod("cod", "Cash on Delivery"));
    coordinator
        .submit_payment_step()
        .expect("payment step failed");
    coordinator.submit_order().await.expect("order failed");

    let placed = coordinator.state();
    tracing::info!(
        order = placed.order_data().map(|o| o.order_number.as_str()).unwrap_or("?"),
        redirect = navigator.last_redirect().as_deref().unwrap_or("?"),
        cart_empty = cart.is_empty(),
        "checkout complete"
    );

    // 8. Teardown
    sampler.shutdown().await;
    tracing::info!(samples = sink.sample_count(), "behavior samples recorded");
}
