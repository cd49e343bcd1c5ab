//! Checkout configuration loaded from environment variables.

use std::time::Duration;

/// Orchestrator tuning knobs with sensible defaults.
///
/// Reads from environment variables:
/// - `CHECKOUT_TAX_DEBOUNCE_MS` — tax recomputation debounce (default: `500`)
/// - `CHECKOUT_MAX_RETRIES` — order submission retry cap (default: `3`)
/// - `CHECKOUT_TELEMETRY_INTERVAL_SECS` — behavior sampling period (default: `30`)
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    pub tax_debounce: Duration,
    pub max_order_retries: u32,
    pub telemetry_interval: Duration,
}

impl CheckoutConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tax_debounce: std::env::var("CHECKOUT_TAX_DEBOUNCE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.tax_debounce),
            max_order_retries: std::env::var("CHECKOUT_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_order_retries),
            telemetry_interval: std::env::var("CHECKOUT_TELEMETRY_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.telemetry_interval),
        }
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            tax_debounce: Duration::from_millis(500),
            max_order_retries: 3,
            telemetry_interval: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = CheckoutConfig::default();
        assert_eq!(config.tax_debounce, Duration::from_millis(500));
        assert_eq!(config.max_order_retries, 3);
        assert_eq!(config.telemetry_interval, Duration::from_secs(30));
    }
}
