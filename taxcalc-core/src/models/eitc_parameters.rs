use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// EITC parameters for one qualifying-children count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EitcBucket {
    /// Phase-in rate applied to earned income.
    pub credit_rate: Decimal,
    /// Earned income at which the credit reaches its maximum.
    pub earned_income_threshold: Decimal,
    pub max_credit: Decimal,
    pub phaseout_rate: Decimal,
    pub phaseout_start: Decimal,
    /// Phase-out start for joint filers; the excess over `phaseout_start`
    /// also extends the completion threshold for joint filers.
    pub phaseout_start_mfj: Decimal,
    /// Income at which the credit fully phases out for non-joint filers.
    pub completion_threshold: Decimal,
}

/// EITC parameters for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EitcYearParameters {
    pub tax_year: i32,
    /// Investment income above this disqualifies the taxpayer outright.
    pub investment_income_limit: Decimal,
    /// Indexed by qualifying-children count, 0 through 3.
    pub buckets: [EitcBucket; 4],
}

impl EitcYearParameters {
    /// Bucket for a qualifying-children count, clamped to the 0–3 range the
    /// credit distinguishes.
    pub fn bucket_for(&self, qualifying_children: u32) -> &EitcBucket {
        &self.buckets[qualifying_children.min(3) as usize]
    }
}
