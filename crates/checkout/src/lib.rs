//! Checkout orchestration for the storefront.
//!
//! This crate drives the three-step checkout wizard against its external
//! collaborators:
//! 1. Shipping — capture the address and quote shipping
//! 2. Payment — select a payment method
//! 3. Review — submit the order, branching on COD vs gateway redirect
//!
//! Supporting machinery: a debounced tax coordinator with offline
//! fallback, a persistence bridge that keeps wizard progress across
//! reloads, and a best-effort behavior sampler isolated from the
//! transactional path.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod persistence;
pub mod services;
pub mod store;
pub mod tax;
pub mod telemetry;

pub use config::CheckoutConfig;
pub use coordinator::CheckoutCoordinator;
pub use error::{CheckoutError, Result, ServiceError};
pub use persistence::{CHECKOUT_STATE_KEY, PersistenceBridge};
pub use services::{
    BehaviorSink, CartStore, InMemoryBehaviorSink, InMemoryCartStore, InMemoryOrderGateway,
    InMemoryRateService, InMemoryTaxService, LocalTaxEstimator, Navigator, OrderGateway,
    RateService, RecordingNavigator, ShippingQuote, TaxService,
};
pub use store::CheckoutStore;
pub use tax::TaxCoordinator;
pub use telemetry::{
    ActivitySignals, BehaviorSample, BehaviorSampler, DeviceClass, SESSION_ID_KEY,
};
