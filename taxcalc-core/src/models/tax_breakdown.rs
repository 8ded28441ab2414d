use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::filing_status::FilingStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeductionType {
    Standard,
    Itemized,
}

/// Tax accrued in one bracket actually touched by the walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub rate: Decimal,
    /// Income consumed by this bracket.
    pub taxable_amount: Decimal,
    pub tax: Decimal,
}

/// Full federal result for one request.
///
/// Produced fresh per call and never mutated; intermediate components are
/// kept so callers can render a line-by-line explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub tax_year: i32,
    pub filing_status: FilingStatus,

    pub adjusted_gross_income: Decimal,
    pub deduction_type: DeductionType,
    pub deduction_amount: Decimal,
    pub qbi_deduction: Decimal,
    pub taxable_income: Decimal,

    pub bracket_breakdown: Vec<BracketSlice>,
    pub ordinary_income_tax: Decimal,
    pub capital_gains_tax: Decimal,
    pub self_employment_tax: Decimal,
    pub net_investment_income_tax: Decimal,
    pub additional_medicare_tax: Decimal,
    pub alternative_minimum_tax: Decimal,
    pub child_tax_credit: Decimal,

    pub total_federal_tax: Decimal,
    pub effective_rate: Decimal,
    pub marginal_rate: Decimal,
    pub estimated_quarterly_payment: Decimal,
}
