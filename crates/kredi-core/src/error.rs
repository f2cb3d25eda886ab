use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KrediError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (delta: {last_delta})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_delta: Decimal,
    },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),
}

impl KrediError {
    /// True for errors caused by the caller's input rather than by the arithmetic.
    pub fn is_validation(&self) -> bool {
        matches!(self, KrediError::InvalidInput { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_invalid_input_is_validation() {
        let invalid = KrediError::InvalidInput {
            field: "term".into(),
            reason: "must be positive".into(),
        };
        assert!(invalid.is_validation());
        assert_eq!(invalid.to_string(), "Invalid input: term: must be positive");

        let computed = [
            KrediError::FinancialImpossibility("overflow".into()),
            KrediError::ConvergenceFailure {
                function: "IRR".into(),
                iterations: 100,
                last_delta: Decimal::ONE,
            },
            KrediError::InsufficientData("one flow".into()),
            KrediError::DivisionByZero { context: "annuity".into() },
            KrediError::DateError("out of range".into()),
        ];
        assert!(computed.iter().all(|e| !e.is_validation()));
    }
}
