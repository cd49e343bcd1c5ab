//! Tax calculation service trait, in-memory remote, and offline estimator.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::Money;
use domain::{TaxCalculation, TaxLine, TaxRequest, TaxSummary};

use crate::error::ServiceError;

/// Trait for tax calculation.
///
/// The remote service and the offline fallback estimator share this
/// interface; the coordinator only tells them apart by which slot they
/// occupy.
#[async_trait]
pub trait TaxService: Send + Sync {
    /// Calculates tax for the given request.
    async fn calculate(&self, request: &TaxRequest) -> Result<TaxCalculation, ServiceError>;
}

/// GST rate applied to shipping charges.
const SHIPPING_RATE: f64 = 18.0;

fn rate_for(category: Option<&str>) -> f64 {
    match category {
        // Printed books are GST-exempt.
        Some("books") => 0.0,
        Some("stationery") => 12.0,
        _ => 18.0,
    }
}

fn split(taxable: Money, rate: f64, inter_state: bool) -> (Money, Money, Money) {
    if inter_state {
        (Money::zero(), Money::zero(), taxable.percent(rate))
    } else {
        let half = taxable.percent(rate / 2.0);
        (half, half, Money::zero())
    }
}

/// Offline GST estimator used when the remote tax service is unreachable.
///
/// Splits intra-state tax into CGST/SGST halves and inter-state tax into
/// IGST, with per-item rates keyed by tax category. Non-authoritative: the
/// backend re-verifies tax at order placement.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTaxEstimator;

impl LocalTaxEstimator {
    /// Creates a new estimator.
    pub fn new() -> Self {
        Self
    }

    /// Computes the full breakdown for a validated request.
    pub fn breakdown(request: &TaxRequest) -> TaxCalculation {
        let mut lines = Vec::with_capacity(request.items.len());
        let mut taxable_total = Money::zero();
        let (mut cgst_total, mut sgst_total, mut igst_total) =
            (Money::zero(), Money::zero(), Money::zero());

        for item in &request.items {
            let taxable = item.line_total();
            let rate = rate_for(item.tax_category.as_deref());
            let (cgst, sgst, igst) = split(taxable, rate, request.is_inter_state);

            taxable_total += taxable;
            cgst_total += cgst;
            sgst_total += sgst;
            igst_total += igst;

            lines.push(TaxLine {
                product_id: item.product_id.clone(),
                name: item.name.clone(),
                taxable_amount: taxable,
                rate,
                cgst,
                sgst,
                igst,
            });
        }

        let (ship_cgst, ship_sgst, ship_igst) =
            split(request.shipping_cost, SHIPPING_RATE, request.is_inter_state);
        taxable_total += request.shipping_cost;
        cgst_total += ship_cgst;
        sgst_total += ship_sgst;
        igst_total += ship_igst;

        let total_tax = cgst_total + sgst_total + igst_total;
        TaxCalculation {
            lines,
            summary: TaxSummary {
                taxable_amount: taxable_total,
                cgst: cgst_total,
                sgst: sgst_total,
                igst: igst_total,
                total_tax,
                grand_total: taxable_total + total_tax,
            },
            estimated: false,
        }
    }
}

#[async_trait]
impl TaxService for LocalTaxEstimator {
    async fn calculate(&self, request: &TaxRequest) -> Result<TaxCalculation, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::http(400, e.to_string()))?;
        Ok(Self::breakdown(request))
    }
}

#[derive(Debug, Default)]
struct InMemoryTaxState {
    calls: u32,
    fail_on_calculate: bool,
    last_request: Option<TaxRequest>,
}

/// In-memory stand-in for the remote tax service.
///
/// Serves the same figures as the estimator but records calls and supports
/// failure injection, which is what the coordinator tests need.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaxService {
    state: Arc<RwLock<InMemoryTaxState>>,
}

impl InMemoryTaxService {
    /// Creates a new in-memory tax service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the service to fail calculate calls.
    pub fn set_fail_on_calculate(&self, fail: bool) {
        self.state.write().unwrap().fail_on_calculate = fail;
    }

    /// Returns the number of calculate calls served (including failures).
    pub fn call_count(&self) -> u32 {
        self.state.read().unwrap().calls
    }

    /// Returns the most recent request received.
    pub fn last_request(&self) -> Option<TaxRequest> {
        self.state.read().unwrap().last_request.clone()
    }
}

#[async_trait]
impl TaxService for InMemoryTaxService {
    async fn calculate(&self, request: &TaxRequest) -> Result<TaxCalculation, ServiceError> {
        {
            let mut state = self.state.write().unwrap();
            state.calls += 1;
            state.last_request = Some(request.clone());

            if state.fail_on_calculate {
                return Err(ServiceError::http(503, "tax service unavailable"));
            }
        }

        request
            .validate()
            .map_err(|e| ServiceError::http(400, e.to_string()))?;
        Ok(LocalTaxEstimator::breakdown(request))
    }
}
