//! Shipping rate service trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::Money;

use crate::error::ServiceError;

/// A shipping quote for a destination.
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingQuote {
    /// Cost of delivering to the destination.
    pub shipping_cost: Money,

    /// Free-text delivery estimate shown to the shopper.
    pub estimated_delivery: String,
}

/// Trait for the shipping rate lookup.
#[async_trait]
pub trait RateService: Send + Sync {
    /// Quotes shipping for a destination postal code.
    async fn quote(&self, postal_code: &str) -> Result<ShippingQuote, ServiceError>;
}

#[derive(Debug)]
struct InMemoryRateState {
    quote: ShippingQuote,
    quote_calls: u32,
    fail_on_quote: bool,
}

/// In-memory rate service for testing.
#[derive(Debug, Clone)]
pub struct InMemoryRateService {
    state: Arc<RwLock<InMemoryRateState>>,
}

impl Default for InMemoryRateService {
    fn default() -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryRateState {
                quote: ShippingQuote {
                    shipping_cost: Money::from_rupees(50),
                    estimated_delivery: "3-5 business days".to_string(),
                },
                quote_calls: 0,
                fail_on_quote: false,
            })),
        }
    }
}

impl InMemoryRateService {
    /// Creates a new in-memory rate service with a flat default quote.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the quote returned for every destination.
    pub fn set_quote(&self, quote: ShippingQuote) {
        self.state.write().unwrap().quote = quote;
    }

    /// Configures the service to fail quote calls.
    pub fn set_fail_on_quote(&self, fail: bool) {
        self.state.write().unwrap().fail_on_quote = fail;
    }

    /// Returns the number of quote calls served.
    pub fn quote_count(&self) -> u32 {
        self.state.read().unwrap().quote_calls
    }
}

#[async_trait]
impl RateService for InMemoryRateService {
    async fn quote(&self, _postal_code: &str) -> Result<ShippingQuote, ServiceError> {
        let mut state = self.state.write().unwrap();
        state.quote_calls += 1;

        if state.fail_on_quote {
            return Err(ServiceError::new(
                "delivery not available for this address",
            ));
        }

        Ok(state.quote.clone())
    }
}
