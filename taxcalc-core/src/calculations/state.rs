//! State income tax engine.
//!
//! Dispatches on the state's tax type: no-tax states owe nothing, flat
//! states apply one rate to income after deductions, and graduated states
//! reuse the federal bracket walk on their own tables. State tables only
//! distinguish single from married-filing-jointly amounts, so the four
//! federal filing statuses collapse to two here.
//!
//! Local and city taxes are never computed; `local_taxes` is passed through
//! so callers can attach a disclaimer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::brackets::compute_bracket_tax;
use crate::calculations::common::{max, round_half_up, round_rate};
use crate::error::TaxEngineError;
use crate::models::{BracketSlice, FilingStatus, StateInfo, StateTaxType};
use crate::providers::StateDataProvider;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTaxRequest {
    pub filing_status: FilingStatus,
    /// Income subject to state tax before state deductions.
    pub taxable_income: Decimal,
    /// Denominator for the effective rate.
    pub gross_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTaxAssessment {
    pub state_code: String,
    pub tax_type: StateTaxType,
    /// Standard deduction plus personal exemption applied, zero when the
    /// state defines neither.
    pub deduction_applied: Decimal,
    pub tax: Decimal,
    pub effective_rate: Decimal,
    pub marginal_rate: Decimal,
    /// Per-bracket detail for graduated states, empty otherwise.
    pub bracket_breakdown: Vec<BracketSlice>,
    /// The state levies local/city income taxes this engine does not
    /// compute.
    pub has_local_taxes: bool,
}

/// Provider-backed engine; resolves the state code before assessing.
#[derive(Clone, Copy)]
pub struct StateTaxEngine<'a> {
    provider: &'a dyn StateDataProvider,
}

impl<'a> StateTaxEngine<'a> {
    pub fn new(provider: &'a dyn StateDataProvider) -> Self {
        Self { provider }
    }

    /// Assesses state tax for a two-letter state code, case-insensitively.
    ///
    /// # Errors
    ///
    /// Fails with [`TaxEngineError::InvalidState`] when the code is
    /// unknown.
    pub fn calculate(
        &self,
        state_code: &str,
        request: &StateTaxRequest,
    ) -> Result<StateTaxAssessment, TaxEngineError> {
        let info = self
            .provider
            .get(state_code)
            .ok_or_else(|| TaxEngineError::InvalidState(state_code.to_string()))?;
        Ok(assess_state(info, request))
    }
}

/// Assesses one state's tax against a request.
pub fn assess_state(
    info: &StateInfo,
    request: &StateTaxRequest,
) -> StateTaxAssessment {
    let deduction = state_deduction(info, request.filing_status);
    let after_deduction = request.taxable_income - deduction;

    let (tax, marginal_rate, bracket_breakdown) = match info.tax_type {
        StateTaxType::None => (Decimal::ZERO, Decimal::ZERO, Vec::new()),
        StateTaxType::Flat => {
            let tax = round_half_up(max(after_deduction, Decimal::ZERO) * info.top_rate);
            let marginal_rate = if tax > Decimal::ZERO {
                info.top_rate
            } else {
                Decimal::ZERO
            };
            (tax, marginal_rate, Vec::new())
        }
        StateTaxType::Graduated => match &info.brackets {
            Some(brackets) => {
                let result = compute_bracket_tax(after_deduction, brackets);
                (
                    round_half_up(result.total),
                    result.marginal_rate,
                    result.breakdown,
                )
            }
            None => {
                // A graduated state without brackets is a data bug; treat
                // it as untaxable rather than guessing a schedule.
                warn!(state = %info.code, "graduated state has no bracket table");
                (Decimal::ZERO, Decimal::ZERO, Vec::new())
            }
        },
    };

    let effective_rate = if request.gross_income.is_zero() {
        Decimal::ZERO
    } else {
        round_rate(tax / request.gross_income)
    };

    StateTaxAssessment {
        state_code: info.code.clone(),
        tax_type: info.tax_type,
        deduction_applied: deduction,
        tax,
        effective_rate,
        marginal_rate,
        bracket_breakdown,
        has_local_taxes: info.local_taxes,
    }
}

fn state_deduction(
    info: &StateInfo,
    status: FilingStatus,
) -> Decimal {
    let standard = info
        .standard_deduction
        .as_ref()
        .map(|d| d.get(status))
        .unwrap_or_default();
    let exemption = info
        .personal_exemption
        .as_ref()
        .map(|d| d.get(status))
        .unwrap_or_default();
    standard + exemption
}
