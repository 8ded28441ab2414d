use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::filing_status::FilingStatus;
use crate::models::tax_bracket::TaxBracket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateTaxType {
    /// No state income tax.
    None,
    /// Single rate on taxable income after deductions.
    Flat,
    /// Progressive brackets, same invariants as the federal tables.
    Graduated,
}

/// Deduction amounts keyed by the collapsed state filing status.
///
/// State tables only distinguish joint filers from everyone else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDeductionAmounts {
    pub single: Decimal,
    pub married: Decimal,
}

impl StateDeductionAmounts {
    pub fn get(&self, status: FilingStatus) -> Decimal {
        if status.is_married_joint() {
            self.married
        } else {
            self.single
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateInfo {
    /// Two-letter postal code, stored uppercase.
    pub code: String,
    pub name: String,
    pub tax_type: StateTaxType,
    pub top_rate: Decimal,
    /// Present iff `tax_type` is `Graduated`.
    pub brackets: Option<Vec<TaxBracket>>,
    pub standard_deduction: Option<StateDeductionAmounts>,
    pub personal_exemption: Option<StateDeductionAmounts>,
    /// Whether this state's income tax is deductible on the federal
    /// Schedule A (subject to the SALT cap).
    pub salt_deduction_on_federal: bool,
    /// Informational only; local/city amounts are never computed here.
    pub local_taxes: bool,
}
