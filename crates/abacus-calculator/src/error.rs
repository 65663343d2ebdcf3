//! Error types for calculator evaluation and construction.

use abacus_types::Number;
use serde::Serialize;
use thiserror::Error;

/// Result of a single `calculate` call.
pub type CalculationResult = Result<Number, CalculationError>;

/// Failures raised while evaluating an operator over its operands.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalculationError {
    /// The operator symbol has no entry in the operator table
    #[error("unknown operator '{symbol}'")]
    UnknownOperator { symbol: String },

    /// Fewer operands than the reduction needs
    #[error("expected at least {required} operands, got {given}")]
    InsufficientOperands { required: usize, given: usize },

    /// Zero divisor for `/`, `//`, `%` or a zero base raised to a negative power
    #[error("division by zero in '{operator}'")]
    DivisionByZero { operator: String },

    /// Integer result does not fit, or a finite float computation overflowed
    #[error("numeric overflow in '{operator}'")]
    ArithmeticOverflow { operator: String },

    /// Result is not a real number (e.g. negative base with fractional exponent)
    #[error("math domain error in '{operator}': {message}")]
    DomainError { operator: String, message: String },
}

impl CalculationError {
    /// Stable identifier for logs and serialized outcomes
    pub fn kind(&self) -> &'static str {
        match self {
            CalculationError::UnknownOperator { .. } => "unknown_operator",
            CalculationError::InsufficientOperands { .. } => "insufficient_operands",
            CalculationError::DivisionByZero { .. } => "division_by_zero",
            CalculationError::ArithmeticOverflow { .. } => "arithmetic_overflow",
            CalculationError::DomainError { .. } => "domain_error",
        }
    }

    pub(crate) fn division_by_zero(operator: &str) -> Self {
        CalculationError::DivisionByZero { operator: operator.to_string() }
    }

    pub(crate) fn overflow(operator: &str) -> Self {
        CalculationError::ArithmeticOverflow { operator: operator.to_string() }
    }
}

/// Failures raised by the calculator factory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// No constructor registered under this kind
    #[error("unknown calculator kind '{kind}'")]
    UnknownCalculatorKind { kind: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CalculationError::InsufficientOperands { required: 2, given: 1 };
        assert_eq!(err.to_string(), "expected at least 2 operands, got 1");
        assert_eq!(err.kind(), "insufficient_operands");

        let err = CalculationError::division_by_zero("//");
        assert_eq!(err.to_string(), "division by zero in '//'");

        let err = FactoryError::UnknownCalculatorKind { kind: "bogus".into() };
        assert_eq!(err.to_string(), "unknown calculator kind 'bogus'");
    }
}
