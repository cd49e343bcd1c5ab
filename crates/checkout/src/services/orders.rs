//! Order gateway trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::{OrderPayload, OrderReceipt};

use crate::error::ServiceError;

/// Trait for the order-creation backend.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submits an order payload, returning the created-order response.
    async fn create_order(&self, payload: &OrderPayload) -> Result<OrderReceipt, ServiceError>;
}

#[derive(Debug, Default)]
struct InMemoryOrderState {
    orders: Vec<OrderPayload>,
    next_id: u32,
    create_calls: u32,
    payment_url: Option<String>,
    fail_with: Option<ServiceError>,
}

/// In-memory order gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderGateway {
    state: Arc<RwLock<InMemoryOrderState>>,
}

impl InMemoryOrderGateway {
    /// Creates a new in-memory order gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to fail every create call with `error`.
    pub fn set_fail_with(&self, error: ServiceError) {
        self.state.write().unwrap().fail_with = Some(error);
    }

    /// Clears a previously configured failure.
    pub fn clear_failure(&self) {
        self.state.write().unwrap().fail_with = None;
    }

    /// Sets the payment URL returned with subsequent receipts.
    pub fn set_payment_url(&self, url: impl Into<String>) {
        self.state.write().unwrap().payment_url = Some(url.into());
    }

    /// Returns the number of orders created.
    pub fn order_count(&self) -> usize {
        self.state.read().unwrap().orders.len()
    }

    /// Returns the number of create calls served, including failures.
    pub fn create_calls(&self) -> u32 {
        self.state.read().unwrap().create_calls
    }

    /// Returns the most recently created order payload.
    pub fn last_order(&self) -> Option<OrderPayload> {
        self.state.read().unwrap().orders.last().cloned()
    }
}

#[async_trait]
impl OrderGateway for InMemoryOrderGateway {
    async fn create_order(&self, payload: &OrderPayload) -> Result<OrderReceipt, ServiceError> {
        let mut state = self.state.write().unwrap();
        state.create_calls += 1;

        if let Some(error) = &state.fail_with {
            return Err(error.clone());
        }

        state.next_id += 1;
        let order_number = format!("ORD-{:04}", state.next_id);
        state.orders.push(payload.clone());

        Ok(OrderReceipt {
            order_number,
            payment_url: state.payment_url.clone(),
        })
    }
}
