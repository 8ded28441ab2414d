mod eitc_parameters;
mod filing_status;
mod state_info;
mod tax_bracket;
mod tax_breakdown;
mod tax_input;
mod year_parameters;

pub use eitc_parameters::{EitcBucket, EitcYearParameters};
pub use filing_status::{ByFilingStatus, FilingStatus};
pub use state_info::{StateDeductionAmounts, StateInfo, StateTaxType};
pub use tax_bracket::{CapitalGainsBracket, TaxBracket};
pub use tax_breakdown::{BracketSlice, DeductionType, TaxBreakdown};
pub use tax_input::TaxInput;
pub use year_parameters::{
    AmtParameters, ChildTaxCreditParameters, MedicareParameters, ObbbDeductions, ParameterError,
    SaltCapParameters, SocialSecurityParameters, TaxYearParameters,
};
