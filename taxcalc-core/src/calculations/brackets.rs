//! Generic progressive-bracket evaluator.
//!
//! Walks an ordered bracket table, consuming income bracket by bracket, and
//! reports how much of the amount each bracket taxed. The same walk prices
//! federal ordinary income and graduated state income; only the bracket
//! tables differ.
//!
//! No rounding happens here; callers round the totals they store.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use taxcalc_core::calculations::brackets::compute_bracket_tax;
//! use taxcalc_core::models::TaxBracket;
//!
//! let brackets = vec![
//!     TaxBracket::new(dec!(0), Some(dec!(11600)), dec!(0.10)),
//!     TaxBracket::new(dec!(11600), Some(dec!(47150)), dec!(0.12)),
//!     TaxBracket::new(dec!(47150), None, dec!(0.22)),
//! ];
//!
//! let result = compute_bracket_tax(dec!(35400), &brackets);
//!
//! // 11600 × 10% + 23800 × 12% = 1160 + 2856
//! assert_eq!(result.total, dec!(4016));
//! assert_eq!(result.marginal_rate, dec!(0.12));
//! assert_eq!(result.breakdown.len(), 2);
//! ```

use rust_decimal::Decimal;

use crate::models::{BracketSlice, TaxBracket};

/// Result of walking a bracket table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketTax {
    /// One entry per bracket actually touched, in ascending order.
    pub breakdown: Vec<BracketSlice>,
    pub total: Decimal,
    /// Rate of the last bracket touched; zero when nothing was taxable.
    pub marginal_rate: Decimal,
}

impl BracketTax {
    fn zero() -> Self {
        Self {
            breakdown: Vec::new(),
            total: Decimal::ZERO,
            marginal_rate: Decimal::ZERO,
        }
    }
}

/// Walks `brackets` ascending and taxes `taxable_amount` piecewise.
///
/// Each bracket consumes `min(remaining, bracket width)`; the walk stops as
/// soon as nothing remains, so untouched brackets never appear in the
/// breakdown. A non-positive amount touches no bracket and yields a zero
/// total with a zero marginal rate.
pub fn compute_bracket_tax(
    taxable_amount: Decimal,
    brackets: &[TaxBracket],
) -> BracketTax {
    if taxable_amount <= Decimal::ZERO {
        return BracketTax::zero();
    }

    let mut remaining = taxable_amount;
    let mut total = Decimal::ZERO;
    let mut marginal_rate = Decimal::ZERO;
    let mut breakdown = Vec::new();

    for bracket in brackets {
        let consumed = match bracket.max_income {
            Some(max_income) => remaining.min(max_income - bracket.min_income),
            None => remaining,
        };
        let tax = consumed * bracket.rate;

        total += tax;
        marginal_rate = bracket.rate;
        breakdown.push(BracketSlice {
            rate: bracket.rate,
            taxable_amount: consumed,
            tax,
        });

        remaining -= consumed;
        if remaining <= Decimal::ZERO {
            break;
        }
    }

    BracketTax {
        breakdown,
        total,
        marginal_rate,
    }
}
