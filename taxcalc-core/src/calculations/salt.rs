//! SALT deduction cap resolver.
//!
//! Years that define an enhanced cap phase it back down to the base cap
//! dollar-for-dollar as AGI exceeds the enhancement threshold; married
//! filing separately always gets its own (halved) cap. The result gates
//! the state-and-local portion of itemized deduction totals, so the
//! phase-down arithmetic must hold exactly.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use taxcalc_core::calculations::salt::effective_salt_cap;
//! use taxcalc_core::models::{FilingStatus, SaltCapParameters};
//!
//! let cap = SaltCapParameters {
//!     base: dec!(10000),
//!     married_separate: dec!(5000),
//!     enhanced_cap: Some(dec!(40000)),
//!     enhanced_agi_threshold: Some(dec!(500000)),
//! };
//!
//! // 15000 over the threshold phases the 40000 cap down to 25000.
//! assert_eq!(
//!     effective_salt_cap(&cap, FilingStatus::Single, dec!(515000)),
//!     dec!(25000),
//! );
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::max;
use crate::error::TaxEngineError;
use crate::models::{FilingStatus, SaltCapParameters};
use crate::providers::TaxYearDataProvider;

/// Effective SALT cap for a filing status and AGI under one year's
/// parameters.
pub fn effective_salt_cap(
    cap: &SaltCapParameters,
    status: FilingStatus,
    agi: Decimal,
) -> Decimal {
    if status == FilingStatus::MarriedFilingSeparately {
        return cap.married_separate;
    }

    match (cap.enhanced_cap, cap.enhanced_agi_threshold) {
        (Some(enhanced), Some(threshold)) => {
            if agi <= threshold {
                enhanced
            } else {
                let reduction = (agi - threshold).min(enhanced - cap.base);
                max(enhanced - reduction, cap.base)
            }
        }
        _ => cap.base,
    }
}

/// Provider-backed resolver; looks the year up first.
#[derive(Clone, Copy)]
pub struct SaltCapResolver<'a> {
    provider: &'a dyn TaxYearDataProvider,
}

impl<'a> SaltCapResolver<'a> {
    pub fn new(provider: &'a dyn TaxYearDataProvider) -> Self {
        Self { provider }
    }

    /// # Errors
    ///
    /// Fails with [`TaxEngineError::UnsupportedTaxYear`] when the provider
    /// has no table for the year.
    pub fn resolve(
        &self,
        year: i32,
        status: FilingStatus,
        agi: Decimal,
    ) -> Result<Decimal, TaxEngineError> {
        let params = self
            .provider
            .get(year)
            .ok_or(TaxEngineError::UnsupportedTaxYear(year))?;
        Ok(effective_salt_cap(&params.salt_cap, status, agi))
    }
}
