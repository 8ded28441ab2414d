//! Bundled reference data for the tax calculation engine.
//!
//! Everything here implements a `taxcalc-core` provider trait: federal and
//! EITC parameter tables are authored in code, the state table is parsed
//! from embedded CSV. All of it is immutable after construction.

mod eitc;
mod federal;
mod states;

pub use eitc::{BundledEitcTables, eitc_2024, eitc_2025};
pub use federal::{BundledYearTables, year_2024, year_2025};
pub use states::{StateDataError, StateTable};
