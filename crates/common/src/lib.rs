//! Shared value types for the checkout core.
//!
//! This crate provides the currency and cart item types used by both the
//! domain layer and the orchestrator.

mod cart;
mod money;

pub use cart::{CartItem, ProductId};
pub use money::Money;
