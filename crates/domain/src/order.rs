//! Order submission wire types.

use common::{CartItem, Money};
use serde::{Deserialize, Serialize};

use crate::Address;

/// The payload posted to the order-creation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPayload {
    /// Delivery address.
    pub shipping_address: Address,

    /// Billing address; `None` when billing follows shipping.
    pub billing_address: Option<Address>,

    /// Identifier of the selected payment method.
    pub payment_method: String,

    /// Snapshot of the cart at submission time.
    pub items: Vec<CartItem>,

    /// Sum of line totals.
    pub subtotal: Money,

    /// Shipping cost quoted for the destination.
    pub shipping_cost: Money,

    /// subtotal + shipping_cost; tax is re-verified server-side.
    pub total_amount: Money,
}

impl OrderPayload {
    /// Assembles a payload from the captured checkout state and cart.
    pub fn assemble(
        shipping_address: Address,
        billing_address: Option<Address>,
        payment_method: impl Into<String>,
        items: Vec<CartItem>,
        shipping_cost: Money,
    ) -> Self {
        let subtotal: Money = items.iter().map(CartItem::line_total).sum();
        Self {
            shipping_address,
            billing_address,
            payment_method: payment_method.into(),
            subtotal,
            shipping_cost,
            total_amount: subtotal + shipping_cost,
            items,
        }
    }
}

/// The backend's response to a successful order creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// Human-facing order number.
    pub order_number: String,

    /// Gateway redirect target, present for online payment methods.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
}
