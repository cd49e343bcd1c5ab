//! The checkout state aggregate and its reducer.

use common::Money;
use serde::{Deserialize, Serialize};

use crate::{
    Address, CheckoutAction, CheckoutStep, ErrorKind, OrderReceipt, PaymentMethod, RestorePayload,
    TaxCalculation,
};

/// The single mutable aggregate behind the checkout wizard.
///
/// Fields are private; every mutation flows through [`CheckoutState::apply`],
/// which enforces the aggregate invariants:
/// - clearing the error resets the retry counter, setting one keeps it
/// - a tax result and a tax error are never present together
/// - `Restore` merges only the fields its payload carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutState {
    current_step: CheckoutStep,
    shipping_address: Option<Address>,
    billing_address: Option<Address>,
    same_as_billing: bool,
    selected_payment_method: Option<PaymentMethod>,
    is_processing: bool,
    error: Option<String>,
    error_kind: Option<ErrorKind>,
    order_data: Option<OrderReceipt>,
    shipping_cost: Money,
    estimated_delivery: String,
    retry_count: u32,
    tax_calculation: Option<TaxCalculation>,
    is_calculating_tax: bool,
    tax_error: Option<String>,
}

impl Default for CheckoutState {
    fn default() -> Self {
        Self {
            current_step: CheckoutStep::Shipping,
            shipping_address: None,
            billing_address: None,
            same_as_billing: true,
            selected_payment_method: None,
            is_processing: false,
            error: None,
            error_kind: None,
            order_data: None,
            shipping_cost: Money::zero(),
            estimated_delivery: String::new(),
            retry_count: 0,
            tax_calculation: None,
            is_calculating_tax: false,
            tax_error: None,
        }
    }
}

impl CheckoutState {
    /// Applies a single action, transitioning to the next state.
    pub fn apply(&mut self, action: CheckoutAction) {
        match action {
            CheckoutAction::SetStep(step) => {
                self.current_step = step;
            }
            CheckoutAction::SetShippingAddress(address) => {
                self.shipping_address = Some(address);
            }
            CheckoutAction::SetBillingAddress(address) => {
                self.billing_address = address;
            }
            CheckoutAction::SetSameAsBilling(same) => {
                self.same_as_billing = same;
                if same {
                    self.billing_address = None;
                }
            }
            CheckoutAction::SetPaymentMethod(method) => {
                self.selected_payment_method = Some(method);
            }
            CheckoutAction::SetProcessing(processing) => {
                self.is_processing = processing;
            }
            CheckoutAction::SetError { message, kind } => match message {
                Some(message) => {
                    // A fresh error within the same episode keeps the
                    // retry counter.
                    self.error = Some(message);
                    self.error_kind = kind;
                }
                None => {
                    self.error = None;
                    self.error_kind = None;
                    self.retry_count = 0;
                }
            },
            CheckoutAction::SetOrderData(receipt) => {
                self.order_data = Some(receipt);
            }
            CheckoutAction::SetShippingCost(cost) => {
                self.shipping_cost = cost;
            }
            CheckoutAction::SetEstimatedDelivery(estimate) => {
                self.estimated_delivery = estimate;
            }
            CheckoutAction::SetRetryCount(count) => {
                self.retry_count = count;
            }
            CheckoutAction::SetTaxCalculation(calculation) => {
                self.tax_calculation = Some(calculation);
                self.tax_error = None;
                self.is_calculating_tax = false;
            }
            CheckoutAction::SetCalculatingTax(calculating) => {
                self.is_calculating_tax = calculating;
            }
            CheckoutAction::SetTaxError(error) => {
                self.tax_error = Some(error);
                self.tax_calculation = None;
                self.is_calculating_tax = false;
            }
            CheckoutAction::Reset => {
                *self = CheckoutState::default();
            }
            CheckoutAction::Restore(payload) => {
                self.apply_restore(payload);
            }
        }
    }

    fn apply_restore(&mut self, payload: RestorePayload) {
        if let Some(step) = payload.current_step {
            self.current_step = step;
        }
        if let Some(address) = payload.shipping_address {
            self.shipping_address = Some(address);
        }
        if let Some(address) = payload.billing_address {
            self.billing_address = Some(address);
        }
        if let Some(same) = payload.same_as_billing {
            self.same_as_billing = same;
        }
        if let Some(method) = payload.selected_payment_method {
            self.selected_payment_method = Some(method);
        }
        if let Some(cost) = payload.shipping_cost {
            self.shipping_cost = cost;
        }
        if let Some(estimate) = payload.estimated_delivery {
            self.estimated_delivery = estimate;
        }
    }

    /// Extracts the subset of state the persistence bridge stores.
    pub fn persistable(&self) -> RestorePayload {
        RestorePayload {
            current_step: Some(self.current_step),
            shipping_address: self.shipping_address.clone(),
            billing_address: self.billing_address.clone(),
            same_as_billing: Some(self.same_as_billing),
            selected_payment_method: self.selected_payment_method.clone(),
            shipping_cost: Some(self.shipping_cost),
            estimated_delivery: Some(self.estimated_delivery.clone()),
        }
    }
}

// Query methods
impl CheckoutState {
    /// Returns the current wizard step.
    pub fn current_step(&self) -> CheckoutStep {
        self.current_step
    }

    /// Returns the captured shipping address.
    pub fn shipping_address(&self) -> Option<&Address> {
        self.shipping_address.as_ref()
    }

    /// Returns the billing address, present only when it differs from
    /// shipping.
    pub fn billing_address(&self) -> Option<&Address> {
        self.billing_address.as_ref()
    }

    /// Returns true when billing follows the shipping address.
    pub fn same_as_billing(&self) -> bool {
        self.same_as_billing
    }

    /// Returns the selected payment method.
    pub fn selected_payment_method(&self) -> Option<&PaymentMethod> {
        self.selected_payment_method.as_ref()
    }

    /// Returns true while a submission or shipping calculation is in flight.
    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    /// Returns the current error message.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the current error classification.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    /// Returns the created-order response, once submission succeeded.
    pub fn order_data(&self) -> Option<&OrderReceipt> {
        self.order_data.as_ref()
    }

    /// Returns the quoted shipping cost.
    pub fn shipping_cost(&self) -> Money {
        self.shipping_cost
    }

    /// Returns the quoted delivery estimate.
    pub fn estimated_delivery(&self) -> &str {
        &self.estimated_delivery
    }

    /// Returns the submission retry count.
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Returns the latest tax calculation.
    pub fn tax_calculation(&self) -> Option<&TaxCalculation> {
        self.tax_calculation.as_ref()
    }

    /// Returns true while a tax calculation is in flight.
    pub fn is_calculating_tax(&self) -> bool {
        self.is_calculating_tax
    }

    /// Returns the current tax error.
    pub fn tax_error(&self) -> Option<&str> {
        self.tax_error.as_deref()
    }
}
