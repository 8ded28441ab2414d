//! Input validation for the federal pipeline.
//!
//! Every violation is collected and reported together so a caller can fix a
//! request in one round trip. Capital gains and self-employment income are
//! deliberately allowed to be negative (a loss year is valid input), while
//! the other money fields must be non-negative.

use rust_decimal::Decimal;

use crate::error::FieldViolation;
use crate::models::TaxInput;

/// Tax years outside this window are rejected as out of range before any
/// provider lookup; support for a specific in-range year is the provider's
/// call.
const MIN_PLAUSIBLE_YEAR: i32 = 2000;
const MAX_PLAUSIBLE_YEAR: i32 = 2100;

/// Checks a request and returns every violation found (empty when valid).
pub fn validate(input: &TaxInput) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    if input.tax_year < MIN_PLAUSIBLE_YEAR || input.tax_year > MAX_PLAUSIBLE_YEAR {
        violations.push(FieldViolation {
            field: "tax_year",
            message: format!(
                "must be between {MIN_PLAUSIBLE_YEAR} and {MAX_PLAUSIBLE_YEAR}, got {}",
                input.tax_year
            ),
        });
    }

    require_non_negative(&mut violations, "gross_income", Some(input.gross_income));
    require_non_negative(&mut violations, "w2_income", input.w2_income);
    require_non_negative(
        &mut violations,
        "above_the_line_deductions",
        input.above_the_line_deductions,
    );
    require_non_negative(
        &mut violations,
        "itemized_deductions",
        input.itemized_deductions,
    );
    require_non_negative(
        &mut violations,
        "qualified_business_income",
        input.qualified_business_income,
    );
    require_non_negative(
        &mut violations,
        "iso_exercise_spread",
        input.iso_exercise_spread,
    );
    require_non_negative(
        &mut violations,
        "state_tax_deducted",
        input.state_tax_deducted,
    );

    violations
}

fn require_non_negative(
    violations: &mut Vec<FieldViolation>,
    field: &'static str,
    value: Option<Decimal>,
) {
    if let Some(value) = value
        && value < Decimal::ZERO
    {
        violations.push(FieldViolation {
            field,
            message: format!("must not be negative, got {value}"),
        });
    }
}
