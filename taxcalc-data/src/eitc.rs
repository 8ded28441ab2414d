//! Bundled EITC parameter tables.
//!
//! One table per supported year, four buckets each (0 through 3 or more
//! qualifying children). The phase-in boundary is constructed so that
//! `earned_income_threshold × credit_rate` lands on the maximum credit
//! after whole-dollar rounding, and the completion threshold is where the
//! phased-out credit reaches zero.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use taxcalc_core::models::{EitcBucket, EitcYearParameters};
use taxcalc_core::providers::EitcDataProvider;

fn money(amount: i64) -> Decimal {
    Decimal::from(amount)
}

fn rate(mantissa: i64, scale: u32) -> Decimal {
    Decimal::new(mantissa, scale)
}

#[allow(clippy::too_many_arguments)]
fn bucket(
    credit_rate: Decimal,
    earned_income_threshold: i64,
    max_credit: i64,
    phaseout_rate: Decimal,
    phaseout_start: i64,
    phaseout_start_mfj: i64,
    completion_threshold: i64,
) -> EitcBucket {
    EitcBucket {
        credit_rate,
        earned_income_threshold: money(earned_income_threshold),
        max_credit: money(max_credit),
        phaseout_rate,
        phaseout_start: money(phaseout_start),
        phaseout_start_mfj: money(phaseout_start_mfj),
        completion_threshold: money(completion_threshold),
    }
}

/// 2024 EITC table.
pub fn eitc_2024() -> EitcYearParameters {
    EitcYearParameters {
        tax_year: 2024,
        investment_income_limit: money(11_600),
        buckets: [
            bucket(rate(765, 4), 8_260, 632, rate(765, 4), 10_330, 17_250, 18_591),
            bucket(rate(34, 2), 11_750, 3_995, rate(1598, 4), 20_600, 27_520, 45_600),
            bucket(rate(40, 2), 16_510, 6_604, rate(2106, 4), 20_600, 27_520, 51_958),
            bucket(rate(45, 2), 16_510, 7_430, rate(2106, 4), 20_600, 27_520, 55_880),
        ],
    }
}

/// 2025 EITC table.
pub fn eitc_2025() -> EitcYearParameters {
    EitcYearParameters {
        tax_year: 2025,
        investment_income_limit: money(11_950),
        buckets: [
            bucket(rate(765, 4), 8_490, 649, rate(765, 4), 10_620, 17_730, 19_104),
            bucket(rate(34, 2), 12_730, 4_328, rate(1598, 4), 23_350, 30_470, 50_434),
            bucket(rate(40, 2), 17_880, 7_152, rate(2106, 4), 23_350, 30_470, 57_310),
            bucket(rate(45, 2), 17_880, 8_046, rate(2106, 4), 23_350, 30_470, 61_555),
        ],
    }
}

/// All bundled EITC tables, keyed by tax year.
#[derive(Debug, Clone)]
pub struct BundledEitcTables {
    years: BTreeMap<i32, EitcYearParameters>,
}

impl BundledEitcTables {
    pub fn new() -> Self {
        let years = [eitc_2024(), eitc_2025()]
            .into_iter()
            .map(|params| (params.tax_year, params))
            .collect();
        Self { years }
    }
}

impl Default for BundledEitcTables {
    fn default() -> Self {
        Self::new()
    }
}

impl EitcDataProvider for BundledEitcTables {
    fn get(&self, year: i32) -> Option<&EitcYearParameters> {
        self.years.get(&year)
    }
}
