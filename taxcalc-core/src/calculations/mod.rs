//! Tax calculation modules.
//!
//! The bracket walk in [`brackets`] is the shared primitive; [`federal`]
//! composes the full federal pipeline on top of it, [`state`] reuses it for
//! graduated states, and [`eitc`] and [`salt`] stand alone.

pub mod brackets;
pub mod common;
pub mod eitc;
pub mod federal;
pub mod salt;
pub mod state;

pub use brackets::{BracketTax, compute_bracket_tax};
pub use eitc::{EitcEngine, EitcRequest, EitcResult, EitcSegment, evaluate_eitc};
pub use federal::{FederalTaxPipeline, calculate_federal_tax};
pub use salt::{SaltCapResolver, effective_salt_cap};
pub use state::{StateTaxAssessment, StateTaxEngine, StateTaxRequest, assess_state};
