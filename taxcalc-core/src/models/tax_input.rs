use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::filing_status::FilingStatus;

/// Per-request taxpayer input.
///
/// Optional fields default to zero; the federal pipeline resolves all
/// defaults once at its entry point rather than scattering them through the
/// calculation steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInput {
    pub tax_year: i32,
    pub filing_status: FilingStatus,
    pub gross_income: Decimal,

    // Component incomes
    pub w2_income: Option<Decimal>,
    pub self_employment_income: Option<Decimal>,
    pub capital_gains: Option<Decimal>,
    /// Treat `capital_gains` as short-term (taxed as ordinary income).
    pub capital_gains_are_short_term: bool,
    pub short_term_capital_gains: Option<Decimal>,

    // Deductions
    pub above_the_line_deductions: Option<Decimal>,
    pub itemized_deductions: Option<Decimal>,

    // Situational
    pub dependents: u32,
    pub age_65_or_older: bool,
    pub blind: bool,
    pub spouse_age_65_or_older: bool,
    pub spouse_blind: bool,

    pub qualified_business_income: Option<Decimal>,
    pub iso_exercise_spread: Option<Decimal>,
    pub state_tax_deducted: Option<Decimal>,
}

impl TaxInput {
    /// A request with only the required fields set.
    pub fn new(tax_year: i32, filing_status: FilingStatus, gross_income: Decimal) -> Self {
        Self {
            tax_year,
            filing_status,
            gross_income,
            w2_income: None,
            self_employment_income: None,
            capital_gains: None,
            capital_gains_are_short_term: false,
            short_term_capital_gains: None,
            above_the_line_deductions: None,
            itemized_deductions: None,
            dependents: 0,
            age_65_or_older: false,
            blind: false,
            spouse_age_65_or_older: false,
            spouse_blind: false,
            qualified_business_income: None,
            iso_exercise_spread: None,
            state_tax_deducted: None,
        }
    }
}
