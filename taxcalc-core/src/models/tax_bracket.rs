use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal income bracket.
///
/// Bracket lists are ordered by `min_income`, contiguous starting at zero,
/// with strictly increasing rates and an unbounded (`max_income: None`) last
/// bracket. `TaxYearParameters::validate` enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(min_income: Decimal, max_income: Option<Decimal>, rate: Decimal) -> Self {
        Self {
            min_income,
            max_income,
            rate,
        }
    }
}

/// One preferential long-term capital gains tier.
///
/// Tiers are ordered by `threshold` (0% / 15% / 20% for the supported
/// years); the last tier is unbounded (`threshold: None`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalGainsBracket {
    pub rate: Decimal,
    pub threshold: Option<Decimal>,
}
