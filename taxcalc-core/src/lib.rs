pub mod calculations;
pub mod error;
pub mod models;
pub mod providers;
pub mod validation;

pub use calculations::{
    EitcEngine, EitcRequest, EitcResult, EitcSegment, FederalTaxPipeline, SaltCapResolver,
    StateTaxAssessment, StateTaxEngine, StateTaxRequest, calculate_federal_tax,
};
pub use error::{FieldViolation, TaxEngineError};
pub use models::*;
pub use providers::{EitcDataProvider, StateDataProvider, TaxYearDataProvider};
