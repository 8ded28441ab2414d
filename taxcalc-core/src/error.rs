use serde::Serialize;
use thiserror::Error;

/// A single input-field violation.
///
/// The validator reports every violation it finds; the engine aggregates
/// them into one [`TaxEngineError::InvalidInput`] so callers can address
/// all of them at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Engine-level failure taxonomy.
///
/// The engine fails fast and synchronously and never returns a partial
/// breakdown. Calculations are pure and deterministic, so retrying a failed
/// call with the same inputs will always fail the same way; callers must
/// correct the inputs instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxEngineError {
    #[error("tax year {0} is not supported")]
    UnsupportedTaxYear(i32),

    #[error("unknown state code '{0}'")]
    InvalidState(String),

    #[error("invalid input ({} violation{})", .0.len(), if .0.len() == 1 { "" } else { "s" })]
    InvalidInput(Vec<FieldViolation>),

    #[error("calculation error: {0}")]
    Calculation(String),
}

impl TaxEngineError {
    /// The aggregated field violations, when this is an input failure.
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::InvalidInput(violations) => violations,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn invalid_input_display_counts_violations() {
        let err = TaxEngineError::InvalidInput(vec![
            FieldViolation {
                field: "gross_income",
                message: "must not be negative".into(),
            },
            FieldViolation {
                field: "w2_income",
                message: "must not be negative".into(),
            },
        ]);

        assert_eq!(err.to_string(), "invalid input (2 violations)");
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn single_violation_display_is_singular() {
        let err = TaxEngineError::InvalidInput(vec![FieldViolation {
            field: "gross_income",
            message: "must not be negative".into(),
        }]);

        assert_eq!(err.to_string(), "invalid input (1 violation)");
    }

    #[test]
    fn non_input_errors_have_no_violations() {
        assert_eq!(TaxEngineError::UnsupportedTaxYear(1999).violations(), &[]);
    }
}
