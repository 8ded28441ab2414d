//! Data-provider boundaries for the calculation engine.
//!
//! Parameter tables are authored elsewhere and treated as trusted input;
//! the engine only ever reads them through these traits. Implementations
//! must be read-only after construction; every calculation is pure, so
//! sharing one provider across threads needs no locking.

use crate::models::{EitcYearParameters, StateInfo, TaxYearParameters};

/// Per-year federal parameter tables.
pub trait TaxYearDataProvider: Send + Sync {
    /// Table for a tax year, or `None` if the year is unsupported.
    fn get(&self, year: i32) -> Option<&TaxYearParameters>;

    /// Years this provider has tables for, ascending.
    fn supported_years(&self) -> Vec<i32>;
}

/// Per-year EITC parameter tables.
pub trait EitcDataProvider: Send + Sync {
    /// Table for a tax year, or `None` if the year is unsupported.
    fn get(&self, year: i32) -> Option<&EitcYearParameters>;
}

/// State tax reference data.
pub trait StateDataProvider: Send + Sync {
    /// Looks up a state by two-letter code, case-insensitively.
    fn get(&self, code: &str) -> Option<&StateInfo>;
}
