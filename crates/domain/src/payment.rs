//! Payment method records.

use common::Money;
use serde::{Deserialize, Serialize};

/// How a payment method settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    /// Settled through an external payment gateway redirect.
    Online,

    /// Cash on delivery, settled outside the gateway.
    Cod,
}

impl PaymentKind {
    /// Returns the wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Online => "online",
            PaymentKind::Cod => "cod",
        }
    }
}

/// An extra charge a payment method adds on top of the order value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PaymentCharge {
    /// Percentage of the subtotal.
    Percentage(f64),

    /// Flat amount.
    Fixed(Money),
}

/// A payment method offered on the payment step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Backend identifier submitted with the order payload.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Settlement kind; drives the post-submission branch.
    #[serde(rename = "type")]
    pub kind: PaymentKind,

    /// Optional surcharge for using this method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charges: Option<PaymentCharge>,

    /// Free-text processing time shown to the shopper.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<String>,

    /// Whether the method advertises secure processing.
    #[serde(default)]
    pub secure: bool,
}

impl PaymentMethod {
    /// Creates a cash-on-delivery method.
    pub fn cod(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: PaymentKind::Cod,
            charges: None,
            processing_time: None,
            secure: false,
        }
    }

    /// Creates an online gateway method.
    pub fn online(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: PaymentKind::Online,
            charges: None,
            processing_time: None,
            secure: true,
        }
    }

    /// Sets the surcharge.
    pub fn with_charge(mut self, charge: PaymentCharge) -> Self {
        self.charges = Some(charge);
        self
    }

    /// Returns true for cash-on-delivery methods.
    pub fn is_cod(&self) -> bool {
        self.kind == PaymentKind::Cod
    }

    /// Returns the surcharge this method adds on the given subtotal.
    ///
    /// Display-only: the order payload total never includes it.
    pub fn surcharge(&self, subtotal: Money) -> Money {
        match &self.charges {
            Some(PaymentCharge::Percentage(rate)) => subtotal.percent(*rate),
            Some(PaymentCharge::Fixed(amount)) => *amount,
            None => Money::zero(),
        }
    }
}
