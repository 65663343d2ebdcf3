use crate::error::{CalculationError, CalculationResult};
use crate::operator::{OperatorTable, fold};
use abacus_types::Number;
use tracing::trace;

/// Minimum number of operands accepted by [`SimpleCalculator`].
pub const MIN_OPERANDS: usize = 2;

/// A trait for all calculators.
///
/// Implementations evaluate one operator over a list of operands and must not
/// touch shared state; auditing is layered on from the outside.
pub trait Calculator: Send + Sync {
    /// The kind this calculator is registered under.
    fn kind(&self) -> &str;

    /// Evaluates `operator` over `operands`.
    fn calculate(&self, operator: &str, operands: &[Number]) -> CalculationResult;
}

impl<C: Calculator + ?Sized> Calculator for Box<C> {
    fn kind(&self) -> &str {
        (**self).kind()
    }

    fn calculate(&self, operator: &str, operands: &[Number]) -> CalculationResult {
        (**self).calculate(operator, operands)
    }
}

/// Calculator backed by an operator table and a left fold.
#[derive(Debug, Clone, Default)]
pub struct SimpleCalculator {
    operators: OperatorTable,
}

impl SimpleCalculator {
    pub const KIND: &'static str = "simple";

    pub fn new() -> Self {
        Self { operators: OperatorTable::standard() }
    }

    /// Uses `operators` instead of the standard table.
    pub fn with_table(operators: OperatorTable) -> Self {
        Self { operators }
    }

    pub fn operators(&self) -> &OperatorTable {
        &self.operators
    }
}

impl Calculator for SimpleCalculator {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn calculate(&self, operator: &str, operands: &[Number]) -> CalculationResult {
        let reducer = self
            .operators
            .get(operator)
            .ok_or_else(|| CalculationError::UnknownOperator { symbol: operator.to_string() })?;

        if operands.len() < MIN_OPERANDS {
            return Err(CalculationError::InsufficientOperands {
                required: MIN_OPERANDS,
                given: operands.len(),
            });
        }

        let result = fold(reducer, operands);
        trace!(operator, operand_count = operands.len(), ?result, "evaluated");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc(operator: &str, operands: &[i64]) -> CalculationResult {
        let operands: Vec<Number> = operands.iter().copied().map(Number::from).collect();
        SimpleCalculator::new().calculate(operator, &operands)
    }

    #[test]
    fn test_variadic_chains() {
        assert_eq!(calc("+", &[2, 2]).unwrap(), Number::Integer(4));
        assert_eq!(calc("+", &[2, 3, 4]).unwrap(), Number::Integer(9));
        assert_eq!(calc("-", &[10, 2, 3]).unwrap(), Number::Integer(5));
        assert_eq!(calc("*", &[2, 3, 4]).unwrap(), Number::Integer(24));
        assert_eq!(calc("**", &[2, 3, 2]).unwrap(), Number::Integer(64));
        assert_eq!(calc("//", &[7, 2]).unwrap(), Number::Integer(3));
        assert_eq!(calc("%", &[7, 2]).unwrap(), Number::Integer(1));
        assert!(matches!(calc("/", &[7, 2]).unwrap(), Number::Float(f) if f == 3.5));
    }

    #[test]
    fn test_operator_checked_before_arity() {
        let err = calc("^", &[1]).unwrap_err();
        assert_eq!(err, CalculationError::UnknownOperator { symbol: "^".to_string() });
    }

    #[test]
    fn test_insufficient_operands() {
        assert_eq!(
            calc("+", &[5]).unwrap_err(),
            CalculationError::InsufficientOperands { required: 2, given: 1 }
        );
        assert_eq!(
            calc("*", &[]).unwrap_err(),
            CalculationError::InsufficientOperands { required: 2, given: 0 }
        );
    }

    #[test]
    fn test_division_by_zero_propagates_through_chain() {
        let err = calc("/", &[10, 5, 0, 1]).unwrap_err();
        assert_eq!(err, CalculationError::DivisionByZero { operator: "/".to_string() });
    }

    #[test]
    fn test_kind() {
        assert_eq!(SimpleCalculator::new().kind(), "simple");
        assert_eq!(SimpleCalculator::new().operators().len(), 7);
    }
}
