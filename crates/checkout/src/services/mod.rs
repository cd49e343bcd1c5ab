//! Collaborator seams for the checkout core.
//!
//! Remote collaborators (orders, shipping rates, tax, behavior tracking)
//! are async traits; browser-owned collaborators (cart store, navigator)
//! are synchronous, matching the facilities they model. Every trait ships
//! with an in-memory implementation used by tests and the demo binary.

pub mod behavior;
pub mod cart;
pub mod navigator;
pub mod orders;
pub mod shipping;
pub mod tax;

pub use behavior::{BehaviorSink, InMemoryBehaviorSink};
pub use cart::{CartStore, InMemoryCartStore};
pub use navigator::{Navigator, RecordingNavigator};
pub use orders::{InMemoryOrderGateway, OrderGateway};
pub use shipping::{InMemoryRateService, RateService, ShippingQuote};
pub use tax::{InMemoryTaxService, LocalTaxEstimator, TaxService};
