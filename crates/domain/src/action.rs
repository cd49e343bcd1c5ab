//! Reducer actions for the checkout state.

use common::Money;
use serde::{Deserialize, Serialize};

use crate::{
    Address, CheckoutStep, ErrorKind, OrderReceipt, PaymentMethod, TaxCalculation,
};

/// The subset of checkout state that survives a page reload.
///
/// Doubles as the persisted blob layout and the `Restore` merge payload;
/// restoring never touches fields absent from the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestorePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<CheckoutStep>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Address>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_as_billing: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_payment_method: Option<PaymentMethod>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_cost: Option<Money>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<String>,
}

/// Every transition the checkout state admits.
///
/// The reducer in [`crate::CheckoutState::apply`] is the only place these
/// take effect; callers never mutate state directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum CheckoutAction {
    /// Move the wizard to a step.
    SetStep(CheckoutStep),

    /// Record the captured shipping address.
    SetShippingAddress(Address),

    /// Record or clear the billing address.
    SetBillingAddress(Option<Address>),

    /// Toggle billing-follows-shipping.
    SetSameAsBilling(bool),

    /// Record the selected payment method.
    SetPaymentMethod(PaymentMethod),

    /// Toggle the in-flight flag for submission/shipping calls.
    SetProcessing(bool),

    /// Set or clear the current error and its classification.
    SetError {
        message: Option<String>,
        kind: Option<ErrorKind>,
    },

    /// Record the created-order response.
    SetOrderData(OrderReceipt),

    /// Record the quoted shipping cost.
    SetShippingCost(Money),

    /// Record the quoted delivery estimate.
    SetEstimatedDelivery(String),

    /// Set the submission retry counter.
    SetRetryCount(u32),

    /// Store a tax calculation result.
    SetTaxCalculation(TaxCalculation),

    /// Toggle the tax-in-flight flag.
    SetCalculatingTax(bool),

    /// Record a tax failure.
    SetTaxError(String),

    /// Return to the pristine initial state.
    Reset,

    /// Merge persisted fields back into state.
    Restore(RestorePayload),
}

impl CheckoutAction {
    /// Creates a classified error action.
    pub fn error(message: impl Into<String>, kind: ErrorKind) -> Self {
        CheckoutAction::SetError {
            message: Some(message.into()),
            kind: Some(kind),
        }
    }

    /// Creates the error-dismissal action.
    pub fn clear_error() -> Self {
        CheckoutAction::SetError {
            message: None,
            kind: None,
        }
    }

    /// Returns the action's tag name.
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutAction::SetStep(_) => "SetStep",
            CheckoutAction::SetShippingAddress(_) => "SetShippingAddress",
            CheckoutAction::SetBillingAddress(_) => "SetBillingAddress",
            CheckoutAction::SetSameAsBilling(_) => "SetSameAsBilling",
            CheckoutAction::SetPaymentMethod(_) => "SetPaymentMethod",
            CheckoutAction::SetProcessing(_) => "SetProcessing",
            CheckoutAction::SetError { .. } => "SetError",
            CheckoutAction::SetOrderData(_) => "SetOrderData",
            CheckoutAction::SetShippingCost(_) => "SetShippingCost",
            CheckoutAction::SetEstimatedDelivery(_) => "SetEstimatedDelivery",
            CheckoutAction::SetRetryCount(_) => "SetRetryCount",
            CheckoutAction::SetTaxCalculation(_) => "SetTaxCalculation",
            CheckoutAction::SetCalculatingTax(_) => "SetCalculatingTax",
            CheckoutAction::SetTaxError(_) => "SetTaxError",
            CheckoutAction::Reset => "Reset",
            CheckoutAction::Restore(_) => "Restore",
        }
    }
}
