//! Checkout wizard step machine.

use serde::{Deserialize, Serialize};

/// The three sequential phases of the checkout wizard.
///
/// Step transitions:
/// ```text
/// Shipping ◄──► Payment ◄──► Review
/// ```
///
/// The sequencer itself enforces no validation gate; each step's submit
/// handler advances only after its own data is captured. Backward moves
/// are always allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(into = "u8", try_from = "u8")]
pub enum CheckoutStep {
    /// Shipping address capture.
    #[default]
    Shipping,

    /// Payment method selection.
    Payment,

    /// Final order review and submission.
    Review,
}

impl CheckoutStep {
    /// Returns the 1-indexed step number.
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Shipping => 1,
            CheckoutStep::Payment => 2,
            CheckoutStep::Review => 3,
        }
    }

    /// Returns the fragment anchor mirrored into the page location.
    pub fn anchor(&self) -> &'static str {
        match self {
            CheckoutStep::Shipping => "shipping",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Review => "review",
        }
    }

    /// Returns the next step; no-op at Review.
    pub fn next(&self) -> CheckoutStep {
        match self {
            CheckoutStep::Shipping => CheckoutStep::Payment,
            CheckoutStep::Payment | CheckoutStep::Review => CheckoutStep::Review,
        }
    }

    /// Returns the previous step; no-op at Shipping.
    pub fn previous(&self) -> CheckoutStep {
        match self {
            CheckoutStep::Shipping | CheckoutStep::Payment => CheckoutStep::Shipping,
            CheckoutStep::Review => CheckoutStep::Payment,
        }
    }

    /// Returns the step name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Shipping => "Shipping",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Review => "Review",
        }
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<CheckoutStep> for u8 {
    fn from(step: CheckoutStep) -> u8 {
        step.number()
    }
}

impl TryFrom<u8> for CheckoutStep {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(CheckoutStep::Shipping),
            2 => Ok(CheckoutStep::Payment),
            3 => Ok(CheckoutStep::Review),
            other => Err(format!("invalid checkout step: {other}")),
        }
    }
}
