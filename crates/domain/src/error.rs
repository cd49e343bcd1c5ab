//! Checkout error taxonomy and classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of user-facing checkout failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Payment was declined or the gateway misbehaved.
    Payment,

    /// Address or delivery problem.
    Shipping,

    /// Items no longer available.
    Inventory,

    /// Connectivity or upstream availability problem.
    Network,

    /// Missing or malformed input.
    Validation,

    /// Anything that matched no other class.
    General,
}

impl ErrorKind {
    /// Maps an HTTP status to a kind, when the status is conclusive.
    pub fn from_status(status: u16) -> Option<ErrorKind> {
        match status {
            400 => Some(ErrorKind::Validation),
            402 => Some(ErrorKind::Payment),
            409 => Some(ErrorKind::Inventory),
            502 | 503 | 504 => Some(ErrorKind::Network),
            _ => None,
        }
    }

    /// Classifies by keyword families in the message text.
    pub fn from_message(message: &str) -> ErrorKind {
        let text = message.to_lowercase();
        let matches = |words: &[&str]| words.iter().any(|w| text.contains(w));

        if matches(&["payment", "card", "gateway"]) {
            ErrorKind::Payment
        } else if matches(&["shipping", "address", "delivery"]) {
            ErrorKind::Shipping
        } else if matches(&["stock", "inventory", "unavailable"]) {
            ErrorKind::Inventory
        } else if matches(&["network", "connection", "timeout"]) {
            ErrorKind::Network
        } else if matches(&["validation", "invalid", "required"]) {
            ErrorKind::Validation
        } else {
            ErrorKind::General
        }
    }

    /// Full classification: status override first, then keywords.
    pub fn classify(status: Option<u16>, message: &str) -> ErrorKind {
        status
            .and_then(ErrorKind::from_status)
            .unwrap_or_else(|| ErrorKind::from_message(message))
    }

    /// The remedial action suggested alongside errors of this kind.
    pub fn suggested_action(&self) -> &'static str {
        match self {
            ErrorKind::Payment => "try a different payment method or check your card details",
            ErrorKind::Shipping => "verify your shipping address and try again",
            ErrorKind::Inventory => "some items may be out of stock; review your cart",
            ErrorKind::Network => "check your connection and try again",
            ErrorKind::Validation => "check all required fields and try again",
            ErrorKind::General => "try again or contact support",
        }
    }

    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Payment => "payment",
            ErrorKind::Shipping => "shipping",
            ErrorKind::Inventory => "inventory",
            ErrorKind::Network => "network",
            ErrorKind::Validation => "validation",
            ErrorKind::General => "general",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A pre-filled support email for the "contact support" action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportEmail {
    pub to: &'static str,
    pub subject: String,
    pub body: String,
}

impl SupportEmail {
    /// Composes a support email for a classified checkout failure.
    pub fn compose(
        message: &str,
        kind: ErrorKind,
        order_ref: Option<&str>,
        at: DateTime<Utc>,
    ) -> Self {
        let subject = match order_ref {
            Some(order) => format!("Checkout issue with order {order}"),
            None => "Checkout issue".to_string(),
        };

        let mut body = format!(
            "Error: {message}\nCategory: {kind}\nTime: {}\n",
            at.to_rfc3339()
        );
        if let Some(order) = order_ref {
            body.push_str(&format!("Order reference: {order}\n"));
        }

        Self {
            to: "support@example.com",
            subject,
            body,
        }
    }
}
