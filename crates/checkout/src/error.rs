//! Orchestrator error types.

use domain::ErrorKind;
use state_store::StorageError;
use thiserror::Error;

/// A failure reported by a remote collaborator.
///
/// Carries the HTTP status when the transport surfaced one; classification
/// prefers the status and falls back to the message text.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ServiceError {
    /// HTTP status code, when known.
    pub status: Option<u16>,

    /// Human-readable failure description.
    pub message: String,
}

impl ServiceError {
    /// Creates a service error without an HTTP status.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a service error from an HTTP failure response.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Classifies this failure into the user-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::classify(self.status, &self.message)
    }
}

/// Errors that can occur during checkout operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Order submission requires a captured shipping address.
    #[error("shipping address is required")]
    MissingShippingAddress,

    /// Order submission requires a selected payment method.
    #[error("payment method is required")]
    MissingPaymentMethod,

    /// The retry cap for the current error episode was reached.
    #[error("maximum retry attempts reached; please contact support")]
    RetriesExhausted,

    /// An online order came back without a gateway redirect target.
    #[error("Payment URL not received")]
    MissingPaymentUrl,

    /// A remote collaborator failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Browser storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CheckoutError {
    /// Classifies this failure into the user-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckoutError::MissingShippingAddress | CheckoutError::MissingPaymentMethod => {
                ErrorKind::Validation
            }
            CheckoutError::RetriesExhausted => ErrorKind::General,
            CheckoutError::MissingPaymentUrl => ErrorKind::Payment,
            CheckoutError::Service(e) => e.kind(),
            CheckoutError::Storage(_) | CheckoutError::Serialization(_) => ErrorKind::General,
        }
    }
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_prefers_status() {
        let err = ServiceError::http(402, "invalid request");
        assert_eq!(err.kind(), ErrorKind::Payment);
    }

    #[test]
    fn test_service_error_falls_back_to_keywords() {
        let err = ServiceError::new("items out of stock");
        assert_eq!(err.kind(), ErrorKind::Inventory);
    }

    #[test]
    fn test_precondition_errors_are_validation() {
        assert_eq!(
            CheckoutError::MissingShippingAddress.kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            CheckoutError::MissingPaymentMethod.kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_missing_payment_url_is_payment() {
        assert_eq!(CheckoutError::MissingPaymentUrl.kind(), ErrorKind::Payment);
    }
}
