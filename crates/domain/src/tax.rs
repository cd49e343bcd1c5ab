//! Tax calculation wire types.

use common::{CartItem, Money};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Address;

/// Errors raised when a tax request is not calculable as built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxRequestError {
    /// Request carries no items.
    #[error("tax request has no items")]
    NoItems,

    /// Destination state is missing.
    #[error("destination state is required for tax calculation")]
    MissingState,

    /// Destination pincode is missing.
    #[error("destination pincode is required for tax calculation")]
    MissingPincode,
}

/// The request posted to the tax calculation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRequest {
    /// Cart items at the time of the trigger.
    pub items: Vec<CartItem>,

    /// Shipping cost included in the taxable base.
    pub shipping_cost: Money,

    /// Destination state name.
    pub state: String,

    /// Whether the shipment crosses state lines.
    pub is_inter_state: bool,

    /// Destination pincode.
    pub pincode: String,
}

impl TaxRequest {
    /// Builds a request from the current cart and shipping address.
    pub fn from_cart(items: Vec<CartItem>, shipping_cost: Money, destination: &Address) -> Self {
        Self {
            items,
            shipping_cost,
            state: destination.state.clone(),
            // TODO: derive by comparing the destination state against the
            // seller's registered business state; hardcoded intra-state for
            // now, which misclassifies inter-state shipments.
            is_inter_state: false,
            pincode: destination.postal_code.clone(),
        }
    }

    /// Validates the request locally before any remote call.
    pub fn validate(&self) -> Result<(), TaxRequestError> {
        if self.items.is_empty() {
            return Err(TaxRequestError::NoItems);
        }
        if self.state.trim().is_empty() {
            return Err(TaxRequestError::MissingState);
        }
        if self.pincode.trim().is_empty() {
            return Err(TaxRequestError::MissingPincode);
        }
        Ok(())
    }
}

/// Per-line tax breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLine {
    /// Product this line covers.
    pub product_id: common::ProductId,

    /// Product name.
    pub name: String,

    /// Line total the tax was computed on.
    pub taxable_amount: Money,

    /// Applied GST rate in percent.
    pub rate: f64,

    /// Central GST share (intra-state).
    pub cgst: Money,

    /// State GST share (intra-state).
    pub sgst: Money,

    /// Integrated GST (inter-state).
    pub igst: Money,
}

impl TaxLine {
    /// Total tax on this line.
    pub fn total_tax(&self) -> Money {
        self.cgst + self.sgst + self.igst
    }
}

/// Totals across all lines plus shipping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSummary {
    /// Taxable base (line totals plus shipping).
    pub taxable_amount: Money,

    /// Total central GST.
    pub cgst: Money,

    /// Total state GST.
    pub sgst: Money,

    /// Total integrated GST.
    pub igst: Money,

    /// Sum of all tax components.
    pub total_tax: Money,

    /// taxable_amount + total_tax.
    pub grand_total: Money,
}

/// A complete tax calculation as stored in checkout state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCalculation {
    /// Per-item breakdown.
    pub lines: Vec<TaxLine>,

    /// Aggregated totals.
    pub summary: TaxSummary,

    /// True when the figures came from the offline estimator rather than
    /// the authoritative service.
    #[serde(default)]
    pub estimated: bool,
}

impl TaxCalculation {
    /// Marks this calculation as an offline estimate.
    pub fn as_estimate(mut self) -> Self {
        self.estimated = true;
        self
    }
}
