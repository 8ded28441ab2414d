use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::filing_status::ByFilingStatus;
use crate::models::tax_bracket::{CapitalGainsBracket, TaxBracket};

/// Errors raised when a parameter table violates its structural invariants.
///
/// Tables are trusted input, so a violation means the table author made a
/// mistake; downstream bracket walks would silently misprice income if these
/// were let through.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterError {
    #[error("bracket table for {status} is empty")]
    EmptyBrackets { status: &'static str },

    #[error("bracket table for {status} does not start at zero (starts at {start})")]
    BracketsNotStartingAtZero { status: &'static str, start: Decimal },

    #[error("bracket table for {status} is not contiguous at {boundary}")]
    BracketsNotContiguous {
        status: &'static str,
        boundary: Decimal,
    },

    #[error("bracket rates for {status} are not strictly increasing at rate {rate}")]
    BracketRatesNotIncreasing { status: &'static str, rate: Decimal },

    #[error("last bracket for {status} must be unbounded")]
    LastBracketBounded { status: &'static str },

    #[error("capital gains thresholds for {status} are not strictly increasing")]
    GainsThresholdsNotIncreasing { status: &'static str },

    #[error("last capital gains tier for {status} must be unbounded")]
    LastGainsTierBounded { status: &'static str },

    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("{field} must be between 0 and 1, got {value}")]
    RateOutOfRange { field: &'static str, value: Decimal },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSecurityParameters {
    /// Employee-share tax rate; the self-employment calculation doubles it.
    pub tax_rate: Decimal,
    pub wage_base: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicareParameters {
    /// Employee-share tax rate; the self-employment calculation doubles it.
    pub tax_rate: Decimal,
    pub additional_tax_rate: Decimal,
    pub additional_tax_threshold: ByFilingStatus<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildTaxCreditParameters {
    /// Credit per qualifying dependent.
    pub amount: Decimal,
    pub phaseout_start: ByFilingStatus<Decimal>,
    /// Reduction per $1,000 (or fraction thereof) of AGI above the start.
    pub phaseout_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmtParameters {
    pub exemption: ByFilingStatus<Decimal>,
    pub phaseout_start: ByFilingStatus<Decimal>,
    /// AMT base above this amount is taxed at 28% instead of 26%.
    pub rate28_threshold: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaltCapParameters {
    pub base: Decimal,
    pub married_separate: Decimal,
    pub enhanced_cap: Option<Decimal>,
    pub enhanced_agi_threshold: Option<Decimal>,
}

/// Per-category deduction caps introduced by the 2025 tax law changes.
///
/// Carried as reference data for callers that itemize these deductions;
/// the federal pipeline does not consume them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObbbDeductions {
    pub tips_deduction_cap: Decimal,
    pub overtime_deduction_cap: Decimal,
    pub senior_bonus_deduction: Decimal,
    pub car_loan_interest_cap: Decimal,
}

/// Immutable parameter table for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearParameters {
    pub tax_year: i32,
    pub brackets: ByFilingStatus<Vec<TaxBracket>>,
    pub standard_deduction: ByFilingStatus<Decimal>,
    /// Extra standard deduction per age-65/blind condition (self or spouse).
    pub additional_deduction: ByFilingStatus<Decimal>,
    pub capital_gains_brackets: ByFilingStatus<Vec<CapitalGainsBracket>>,
    pub social_security: SocialSecurityParameters,
    pub medicare: MedicareParameters,
    pub child_tax_credit: ChildTaxCreditParameters,
    pub amt: AmtParameters,
    pub salt_cap: SaltCapParameters,
    pub obbb_deductions: Option<ObbbDeductions>,
}

impl TaxYearParameters {
    /// Checks the structural invariants every table must satisfy.
    ///
    /// Returns the first violation found. Bracket lists must be contiguous
    /// from zero with strictly increasing rates and an unbounded tail;
    /// capital-gains tiers must have strictly increasing thresholds and an
    /// unbounded tail; rates must lie in [0, 1] and amounts must be
    /// non-negative.
    pub fn validate(&self) -> Result<(), ParameterError> {
        const STATUSES: [&str; 4] = ["S", "MFJ", "MFS", "HOH"];

        for (status, brackets) in STATUSES.into_iter().zip(self.brackets.values()) {
            validate_bracket_list(status, brackets)?;
        }
        for (status, tiers) in STATUSES.into_iter().zip(self.capital_gains_brackets.values()) {
            validate_gains_tiers(status, tiers)?;
        }
        for amount in self.standard_deduction.values() {
            require_non_negative("standard_deduction", *amount)?;
        }
        for amount in self.additional_deduction.values() {
            require_non_negative("additional_deduction", *amount)?;
        }
        require_rate("social_security.tax_rate", self.social_security.tax_rate)?;
        require_non_negative("social_security.wage_base", self.social_security.wage_base)?;
        require_rate("medicare.tax_rate", self.medicare.tax_rate)?;
        require_rate("medicare.additional_tax_rate", self.medicare.additional_tax_rate)?;
        require_non_negative("child_tax_credit.amount", self.child_tax_credit.amount)?;
        require_non_negative(
            "child_tax_credit.phaseout_rate",
            self.child_tax_credit.phaseout_rate,
        )?;
        require_non_negative("amt.rate28_threshold", self.amt.rate28_threshold)?;
        require_non_negative("salt_cap.base", self.salt_cap.base)?;
        require_non_negative("salt_cap.married_separate", self.salt_cap.married_separate)?;

        Ok(())
    }
}

fn validate_bracket_list(
    status: &'static str,
    brackets: &[TaxBracket],
) -> Result<(), ParameterError> {
    let Some(first) = brackets.first() else {
        return Err(ParameterError::EmptyBrackets { status });
    };
    if first.min_income != Decimal::ZERO {
        return Err(ParameterError::BracketsNotStartingAtZero {
            status,
            start: first.min_income,
        });
    }

    for pair in brackets.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        match prev.max_income {
            Some(boundary) if boundary == next.min_income => {}
            Some(boundary) => {
                return Err(ParameterError::BracketsNotContiguous { status, boundary });
            }
            // An unbounded bracket anywhere but the end leaves later
            // brackets unreachable.
            None => return Err(ParameterError::LastBracketBounded { status }),
        }
        if next.rate <= prev.rate {
            return Err(ParameterError::BracketRatesNotIncreasing {
                status,
                rate: next.rate,
            });
        }
    }

    if brackets.last().is_some_and(|b| b.max_income.is_some()) {
        return Err(ParameterError::LastBracketBounded { status });
    }
    for bracket in brackets {
        require_rate("bracket rate", bracket.rate)?;
    }

    Ok(())
}

fn validate_gains_tiers(
    status: &'static str,
    tiers: &[CapitalGainsBracket],
) -> Result<(), ParameterError> {
    if tiers.is_empty() {
        return Err(ParameterError::EmptyBrackets { status });
    }

    let mut previous: Option<Decimal> = None;
    for (index, tier) in tiers.iter().enumerate() {
        require_rate("capital gains rate", tier.rate)?;
        match tier.threshold {
            Some(threshold) => {
                if index + 1 == tiers.len() {
                    return Err(ParameterError::LastGainsTierBounded { status });
                }
                if previous.is_some_and(|p| threshold <= p) {
                    return Err(ParameterError::GainsThresholdsNotIncreasing { status });
                }
                previous = Some(threshold);
            }
            None => {
                if index + 1 != tiers.len() {
                    return Err(ParameterError::GainsThresholdsNotIncreasing { status });
                }
            }
        }
    }

    Ok(())
}

fn require_non_negative(field: &'static str, value: Decimal) -> Result<(), ParameterError> {
    if value < Decimal::ZERO {
        return Err(ParameterError::NegativeAmount { field, value });
    }
    Ok(())
}

fn require_rate(field: &'static str, value: Decimal) -> Result<(), ParameterError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ParameterError::RateOutOfRange { field, value });
    }
    Ok(())
}
