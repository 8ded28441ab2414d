//! State tax reference data loaded from CSV.
//!
//! Two files describe the table: `states.csv` carries one row per state
//! (tax type, top rate, deduction and exemption amounts, flags) and
//! `state_brackets.csv` carries one row per graduated bracket. Loading is
//! strict: a graduated state without brackets, a bracket row for an
//! unknown state, or a non-contiguous bracket table all fail rather than
//! producing a table that would misprice income.

use std::collections::HashMap;
use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use taxcalc_core::models::{StateDeductionAmounts, StateInfo, StateTaxType, TaxBracket};
use taxcalc_core::providers::StateDataProvider;
use thiserror::Error;

const STATES_CSV: &str = include_str!("../data/states.csv");
const STATE_BRACKETS_CSV: &str = include_str!("../data/state_brackets.csv");

/// Errors that can occur when loading state tax data.
#[derive(Debug, Error)]
pub enum StateDataError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("invalid tax type '{kind}' for state {state}")]
    InvalidTaxType { state: String, kind: String },

    #[error("state {state} lists only one of the two {which} amounts")]
    MismatchedAmounts {
        state: String,
        which: &'static str,
    },

    #[error("bracket row references unknown state '{0}'")]
    UnknownBracketState(String),

    #[error("graduated state {0} has no bracket rows")]
    MissingBrackets(String),

    #[error("bracket table for {0} is not contiguous from zero")]
    MalformedBrackets(String),
}

impl From<csv::Error> for StateDataError {
    fn from(err: csv::Error) -> Self {
        StateDataError::CsvParse(err.to_string())
    }
}

/// A single record from the states CSV file.
#[derive(Debug, Clone, Deserialize)]
struct StateRecord {
    code: String,
    name: String,
    tax_type: String,
    top_rate: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    std_single: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    std_married: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    exempt_single: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    exempt_married: Option<Decimal>,
    salt_on_federal: bool,
    local_taxes: bool,
}

/// A single record from the state brackets CSV file.
#[derive(Debug, Clone, Deserialize)]
struct StateBracketRecord {
    state: String,
    min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    max_income: Option<Decimal>,
    rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// State table keyed by uppercase two-letter code.
#[derive(Debug, Clone)]
pub struct StateTable {
    states: HashMap<String, StateInfo>,
}

impl StateTable {
    /// Loads the table bundled with this crate.
    pub fn bundled() -> Result<Self, StateDataError> {
        Self::parse(STATES_CSV.as_bytes(), STATE_BRACKETS_CSV.as_bytes())
    }

    /// Parses a state table from CSV readers.
    ///
    /// Bracket rows are grouped by state, sorted by `min_income`, and
    /// attached to their graduated state; every group must form a
    /// contiguous table starting at zero with an unbounded tail.
    pub fn parse<R1: Read, R2: Read>(
        states: R1,
        brackets: R2,
    ) -> Result<Self, StateDataError> {
        let mut bracket_reader = csv::Reader::from_reader(brackets);
        let mut bracket_groups: HashMap<String, Vec<TaxBracket>> = HashMap::new();
        for result in bracket_reader.deserialize() {
            let record: StateBracketRecord = result?;
            bracket_groups
                .entry(record.state.trim().to_ascii_uppercase())
                .or_default()
                .push(TaxBracket::new(
                    record.min_income,
                    record.max_income,
                    record.rate,
                ));
        }
        for group in bracket_groups.values_mut() {
            group.sort_by(|a, b| a.min_income.cmp(&b.min_income));
        }

        let mut state_reader = csv::Reader::from_reader(states);
        let mut table = HashMap::new();
        for result in state_reader.deserialize() {
            let record: StateRecord = result?;
            let code = record.code.trim().to_ascii_uppercase();

            let tax_type = match record.tax_type.as_str() {
                "none" => StateTaxType::None,
                "flat" => StateTaxType::Flat,
                "graduated" => StateTaxType::Graduated,
                other => {
                    return Err(StateDataError::InvalidTaxType {
                        state: code,
                        kind: other.to_string(),
                    });
                }
            };

            let brackets = match tax_type {
                StateTaxType::Graduated => {
                    let group = bracket_groups
                        .remove(&code)
                        .ok_or_else(|| StateDataError::MissingBrackets(code.clone()))?;
                    verify_contiguous(&code, &group)?;
                    Some(group)
                }
                _ => None,
            };

            let standard_deduction =
                paired_amounts(&code, "standard deduction", record.std_single, record.std_married)?;
            let personal_exemption = paired_amounts(
                &code,
                "personal exemption",
                record.exempt_single,
                record.exempt_married,
            )?;

            table.insert(code.clone(), StateInfo {
                code,
                name: record.name,
                tax_type,
                top_rate: record.top_rate,
                brackets,
                standard_deduction,
                personal_exemption,
                salt_deduction_on_federal: record.salt_on_federal,
                local_taxes: record.local_taxes,
            });
        }

        // Bracket rows for states that never appeared are typos.
        if let Some(orphan) = bracket_groups.into_keys().next() {
            return Err(StateDataError::UnknownBracketState(orphan));
        }

        Ok(Self { states: table })
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// All state codes, ascending.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.states.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

impl StateDataProvider for StateTable {
    fn get(&self, code: &str) -> Option<&StateInfo> {
        self.states.get(&code.trim().to_ascii_uppercase())
    }
}

fn paired_amounts(
    state: &str,
    which: &'static str,
    single: Option<Decimal>,
    married: Option<Decimal>,
) -> Result<Option<StateDeductionAmounts>, StateDataError> {
    match (single, married) {
        (Some(single), Some(married)) => Ok(Some(StateDeductionAmounts { single, married })),
        (None, None) => Ok(None),
        _ => Err(StateDataError::MismatchedAmounts {
            state: state.to_string(),
            which,
        }),
    }
}

fn verify_contiguous(
    state: &str,
    brackets: &[TaxBracket],
) -> Result<(), StateDataError> {
    let malformed = || StateDataError::MalformedBrackets(state.to_string());

    let first = brackets.first().ok_or_else(malformed)?;
    if first.min_income != Decimal::ZERO {
        return Err(malformed());
    }
    for pair in brackets.windows(2) {
        if pair[0].max_income != Some(pair[1].min_income) {
            return Err(malformed());
        }
    }
    if brackets.last().is_some_and(|b| b.max_income.is_some()) {
        return Err(malformed());
    }
    Ok(())
}
