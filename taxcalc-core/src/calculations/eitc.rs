//! Earned Income Tax Credit engine.
//!
//! The credit is a piecewise function of income with four segments, checked
//! in a fixed order: disqualifiers first, then phase-in, plateau, and
//! phase-out. Two statutory asymmetries are preserved exactly:
//!
//! - the phase-out (and the eligibility cutoff) test the **greater** of
//!   earned income and AGI, while the phase-in rate applies to earned
//!   income alone;
//! - joint filers get both a later phase-out start and an income limit
//!   extended by the same offset.
//!
//! An unsupported year is an [`EitcSegment::Ineligible`] result, not an
//! error; there is simply no credit to compute.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use taxcalc_core::calculations::eitc::{evaluate_eitc, EitcRequest, EitcSegment};
//! use taxcalc_core::models::{EitcBucket, EitcYearParameters, FilingStatus};
//!
//! let bucket = EitcBucket {
//!     credit_rate: dec!(0.34),
//!     earned_income_threshold: dec!(11750),
//!     max_credit: dec!(3995),
//!     phaseout_rate: dec!(0.1598),
//!     phaseout_start: dec!(20600),
//!     phaseout_start_mfj: dec!(27520),
//!     completion_threshold: dec!(45600),
//! };
//! let params = EitcYearParameters {
//!     tax_year: 2024,
//!     investment_income_limit: dec!(11600),
//!     buckets: [bucket.clone(), bucket.clone(), bucket.clone(), bucket],
//! };
//!
//! let request = EitcRequest {
//!     filing_status: FilingStatus::Single,
//!     earned_income: dec!(25000),
//!     adjusted_gross_income: dec!(25000),
//!     qualifying_children: 1,
//!     investment_income: dec!(0),
//! };
//! let result = evaluate_eitc(&params, &request);
//!
//! // 3995 - (25000 - 20600) × 0.1598, rounded to the dollar
//! assert_eq!(result.segment, EitcSegment::PhaseOut);
//! assert_eq!(result.credit, dec!(3292));
//! assert!(result.eligible);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{max, round_to_whole_dollar};
use crate::models::{EitcYearParameters, FilingStatus};
use crate::providers::EitcDataProvider;

/// Segment of the credit curve a taxpayer lands on.
///
/// Exactly one segment holds for any input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EitcSegment {
    Ineligible,
    PhaseIn,
    Plateau,
    PhaseOut,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EitcRequest {
    pub filing_status: FilingStatus,
    pub earned_income: Decimal,
    pub adjusted_gross_income: Decimal,
    /// Clamped to the 0–3 range the credit distinguishes.
    pub qualifying_children: u32,
    pub investment_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EitcResult {
    pub segment: EitcSegment,
    /// Whole-dollar credit, floored at zero.
    pub credit: Decimal,
    pub eligible: bool,
    /// The greater of earned income and AGI, which governs the phase-out.
    pub phaseout_income: Decimal,
}

impl EitcResult {
    fn ineligible(phaseout_income: Decimal) -> Self {
        Self {
            segment: EitcSegment::Ineligible,
            credit: Decimal::ZERO,
            eligible: false,
            phaseout_income,
        }
    }
}

/// Provider-backed engine; resolves the year before evaluating.
#[derive(Clone, Copy)]
pub struct EitcEngine<'a> {
    provider: &'a dyn EitcDataProvider,
}

impl<'a> EitcEngine<'a> {
    pub fn new(provider: &'a dyn EitcDataProvider) -> Self {
        Self { provider }
    }

    /// Evaluates the credit for a tax year. An unsupported year yields an
    /// ineligible result.
    pub fn evaluate(
        &self,
        tax_year: i32,
        request: &EitcRequest,
    ) -> EitcResult {
        match self.provider.get(tax_year) {
            Some(params) => evaluate_eitc(params, request),
            None => {
                debug!(tax_year, "no EITC table for year; taxpayer is ineligible");
                EitcResult::ineligible(max(
                    request.earned_income,
                    request.adjusted_gross_income,
                ))
            }
        }
    }
}

/// Evaluates the credit against one year's parameters.
///
/// Transitions are checked in order: married-filing-separately, the
/// investment-income limit, non-positive earned income, and the income
/// limit all disqualify; then earned income at or below the phase-in
/// threshold earns `earned × rate`; then phase-out income at or below the
/// (status-dependent) phase-out start earns the plateau maximum; anything
/// else is phasing out.
pub fn evaluate_eitc(
    params: &EitcYearParameters,
    request: &EitcRequest,
) -> EitcResult {
    let bucket = params.bucket_for(request.qualifying_children);
    let phaseout_income = max(request.earned_income, request.adjusted_gross_income);

    let joint = request.filing_status.is_married_joint();
    let mfj_offset = bucket.phaseout_start_mfj - bucket.phaseout_start;
    let effective_phaseout_start = if joint {
        bucket.phaseout_start_mfj
    } else {
        bucket.phaseout_start
    };
    let income_limit = if joint {
        bucket.completion_threshold + mfj_offset
    } else {
        bucket.completion_threshold
    };

    if request.filing_status == FilingStatus::MarriedFilingSeparately
        || request.investment_income > params.investment_income_limit
        || request.earned_income <= Decimal::ZERO
        || phaseout_income >= income_limit
    {
        return EitcResult::ineligible(phaseout_income);
    }

    let (segment, raw_credit) = if request.earned_income <= bucket.earned_income_threshold {
        (
            EitcSegment::PhaseIn,
            request.earned_income * bucket.credit_rate,
        )
    } else if phaseout_income <= effective_phaseout_start {
        (EitcSegment::Plateau, bucket.max_credit)
    } else {
        (
            EitcSegment::PhaseOut,
            bucket.max_credit - (phaseout_income - effective_phaseout_start) * bucket.phaseout_rate,
        )
    };

    let credit = round_to_whole_dollar(max(raw_credit, Decimal::ZERO));

    EitcResult {
        segment,
        credit,
        eligible: credit > Decimal::ZERO,
        phaseout_income,
    }
}
