//! Operator table and variadic left-fold reduction
//!
//! Every operator is a pure binary function `(accumulator, operand) -> accumulator`.
//! The table maps symbols to those functions and is frozen once built; chains
//! like `- 10 2 3` are evaluated as `((10 - 2) - 3)` by [`fold`].
//!
//! Numeric behaviour follows the usual dynamic-language conventions:
//! integers stay integral unless `/` is used or a float joins in, `//` rounds
//! toward negative infinity and `%` takes the sign of the divisor.

use crate::error::{CalculationError, CalculationResult};
use abacus_types::Number;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Binary reduction function stored in an [`OperatorTable`].
pub type Reducer = fn(Number, Number) -> CalculationResult;

/// The built-in operator set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "**")]
    Power,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "//")]
    FloorDivide,
    #[serde(rename = "%")]
    Modulo,
}

impl Operator {
    /// All built-in operators, in table order.
    pub const ALL: [Operator; 7] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Power,
        Operator::Divide,
        Operator::FloorDivide,
        Operator::Modulo,
    ];

    pub const fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Power => "**",
            Operator::Divide => "/",
            Operator::FloorDivide => "//",
            Operator::Modulo => "%",
        }
    }

    pub fn reducer(self) -> Reducer {
        match self {
            Operator::Add => add,
            Operator::Subtract => subtract,
            Operator::Multiply => multiply,
            Operator::Power => power,
            Operator::Divide => divide,
            Operator::FloorDivide => floor_divide,
            Operator::Modulo => modulo,
        }
    }

    /// Apply this operator to a single pair of operands.
    pub fn apply(self, lhs: Number, rhs: Number) -> CalculationResult {
        (self.reducer())(lhs, rhs)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = CalculationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| CalculationError::UnknownOperator { symbol: s.to_string() })
    }
}

/// Reduce `operands` left-to-right, seeding the accumulator with the first one.
///
/// Stops at the first failing step. An empty slice is reported as
/// `InsufficientOperands`; arity checks beyond that belong to the caller.
pub fn fold<F>(reducer: F, operands: &[Number]) -> CalculationResult
where
    F: Fn(Number, Number) -> CalculationResult,
{
    let (first, rest) = operands
        .split_first()
        .ok_or(CalculationError::InsufficientOperands { required: 1, given: 0 })?;
    rest.iter().try_fold(*first, |acc, operand| reducer(acc, *operand))
}

/// Immutable mapping from operator symbol to reducer.
#[derive(Clone)]
pub struct OperatorTable {
    reducers: HashMap<String, Reducer>,
}

impl OperatorTable {
    /// Table containing every built-in [`Operator`].
    pub fn standard() -> Self {
        Operator::ALL
            .into_iter()
            .fold(Self::builder(), |builder, op| builder.with(op.symbol(), op.reducer()))
            .build()
    }

    pub fn builder() -> OperatorTableBuilder {
        OperatorTableBuilder::default()
    }

    pub fn get(&self, symbol: &str) -> Option<Reducer> {
        self.reducers.get(symbol).copied()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.reducers.contains_key(symbol)
    }

    /// Registered symbols, sorted for stable output.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.reducers.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }

    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for OperatorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorTable").field("symbols", &self.symbols()).finish()
    }
}

/// Collects reducers before freezing them into an [`OperatorTable`].
#[derive(Default)]
pub struct OperatorTableBuilder {
    reducers: HashMap<String, Reducer>,
}

impl OperatorTableBuilder {
    /// Register `reducer` under `symbol`, replacing any earlier entry.
    pub fn with(mut self, symbol: &str, reducer: Reducer) -> Self {
        self.reducers.insert(symbol.to_string(), reducer);
        self
    }

    pub fn build(self) -> OperatorTable {
        OperatorTable { reducers: self.reducers }
    }
}

fn add(lhs: Number, rhs: Number) -> CalculationResult {
    match (lhs, rhs) {
        (Number::Integer(a), Number::Integer(b)) => {
            a.checked_add(b).map(Number::Integer).ok_or_else(|| CalculationError::overflow("+"))
        }
        (a, b) => Ok(Number::Float(a.as_f64() + b.as_f64())),
    }
}

fn subtract(lhs: Number, rhs: Number) -> CalculationResult {
    match (lhs, rhs) {
        (Number::Integer(a), Number::Integer(b)) => {
            a.checked_sub(b).map(Number::Integer).ok_or_else(|| CalculationError::overflow("-"))
        }
        (a, b) => Ok(Number::Float(a.as_f64() - b.as_f64())),
    }
}

fn multiply(lhs: Number, rhs: Number) -> CalculationResult {
    match (lhs, rhs) {
        (Number::Integer(a), Number::Integer(b)) => {
            a.checked_mul(b).map(Number::Integer).ok_or_else(|| CalculationError::overflow("*"))
        }
        (a, b) => Ok(Number::Float(a.as_f64() * b.as_f64())),
    }
}

fn power(lhs: Number, rhs: Number) -> CalculationResult {
    match (lhs, rhs) {
        (Number::Integer(base), Number::Integer(exp)) if exp >= 0 => integer_power(base, exp),
        (Number::Integer(0), Number::Integer(_)) => Err(CalculationError::division_by_zero("**")),
        (base, exp) => float_power(base.as_f64(), exp.as_f64()),
    }
}

fn integer_power(base: i64, exp: i64) -> CalculationResult {
    if let Ok(exp) = u32::try_from(exp) {
        return base
            .checked_pow(exp)
            .map(Number::Integer)
            .ok_or_else(|| CalculationError::overflow("**"));
    }
    // Exponents beyond u32 only stay representable for these bases.
    match base {
        0 | 1 => Ok(Number::Integer(base)),
        -1 => Ok(Number::Integer(if exp % 2 == 0 { 1 } else { -1 })),
        _ => Err(CalculationError::overflow("**")),
    }
}

fn float_power(base: f64, exp: f64) -> CalculationResult {
    if base == 0.0 && exp < 0.0 {
        return Err(CalculationError::division_by_zero("**"));
    }
    if base < 0.0 && exp.is_finite() && exp.fract() != 0.0 {
        return Err(CalculationError::DomainError {
            operator: "**".to_string(),
            message: format!("negative base {base} with fractional exponent {exp}"),
        });
    }
    let result = base.powf(exp);
    if result.is_infinite() && base.is_finite() && exp.is_finite() {
        return Err(CalculationError::overflow("**"));
    }
    Ok(Number::Float(result))
}

fn divide(lhs: Number, rhs: Number) -> CalculationResult {
    if rhs.is_zero() {
        return Err(CalculationError::division_by_zero("/"));
    }
    Ok(Number::Float(lhs.as_f64() / rhs.as_f64()))
}

fn floor_divide(lhs: Number, rhs: Number) -> CalculationResult {
    if rhs.is_zero() {
        return Err(CalculationError::division_by_zero("//"));
    }
    match (lhs, rhs) {
        (Number::Integer(a), Number::Integer(b)) => {
            let quotient = a.checked_div(b).ok_or_else(|| CalculationError::overflow("//"))?;
            let adjust = a.wrapping_rem(b) != 0 && ((a < 0) != (b < 0));
            Ok(Number::Integer(if adjust { quotient - 1 } else { quotient }))
        }
        (a, b) => Ok(Number::Float(float_divmod(a.as_f64(), b.as_f64()).0)),
    }
}

fn modulo(lhs: Number, rhs: Number) -> CalculationResult {
    if rhs.is_zero() {
        return Err(CalculationError::division_by_zero("%"));
    }
    match (lhs, rhs) {
        (Number::Integer(a), Number::Integer(b)) => {
            let remainder = a.wrapping_rem(b);
            if remainder != 0 && ((remainder < 0) != (b < 0)) {
                Ok(Number::Integer(remainder + b))
            } else {
                Ok(Number::Integer(remainder))
            }
        }
        (a, b) => Ok(Number::Float(float_divmod(a.as_f64(), b.as_f64()).1)),
    }
}

/// Floor quotient and divisor-signed remainder for floats. `b` must be non-zero.
fn float_divmod(a: f64, b: f64) -> (f64, f64) {
    let mut remainder = a % b;
    let mut quotient = (a - remainder) / b;
    if remainder != 0.0 {
        if (b < 0.0) != (remainder < 0.0) {
            remainder += b;
            quotient -= 1.0;
        }
    } else {
        remainder = 0.0_f64.copysign(b);
    }

    let floored = if quotient != 0.0 {
        let mut floored = quotient.floor();
        if quotient - floored > 0.5 {
            floored += 1.0;
        }
        floored
    } else {
        0.0_f64.copysign(a / b)
    };
    (floored, remainder)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(i: i64) -> Number {
        Number::Integer(i)
    }

    fn float(f: f64) -> Number {
        Number::Float(f)
    }

    #[test]
    fn test_symbols_round_trip() {
        for op in Operator::ALL {
            assert_eq!(op.symbol().parse::<Operator>().unwrap(), op);
        }
        assert_eq!(
            "^".parse::<Operator>().unwrap_err(),
            CalculationError::UnknownOperator { symbol: "^".to_string() }
        );
    }

    #[test]
    fn test_integer_arithmetic_stays_integral() {
        assert!(matches!(Operator::Add.apply(int(2), int(2)), Ok(Number::Integer(4))));
        assert!(matches!(Operator::Multiply.apply(int(6), int(7)), Ok(Number::Integer(42))));
        assert!(matches!(Operator::Power.apply(int(2), int(10)), Ok(Number::Integer(1024))));
        assert!(matches!(Operator::Add.apply(int(2), float(0.5)), Ok(Number::Float(f)) if f == 2.5));
    }

    #[test]
    fn test_division_always_yields_float() {
        assert!(matches!(Operator::Divide.apply(int(7), int(2)), Ok(Number::Float(f)) if f == 3.5));
        assert!(matches!(Operator::Divide.apply(int(4), int(2)), Ok(Number::Float(f)) if f == 2.0));
    }

    #[test]
    fn test_floor_division_rounds_down() {
        assert_eq!(Operator::FloorDivide.apply(int(7), int(2)).unwrap(), int(3));
        assert_eq!(Operator::FloorDivide.apply(int(-7), int(2)).unwrap(), int(-4));
        assert_eq!(Operator::FloorDivide.apply(int(7), int(-2)).unwrap(), int(-4));
        assert_eq!(Operator::FloorDivide.apply(float(7.5), int(2)).unwrap(), float(3.0));
        assert_eq!(Operator::FloorDivide.apply(float(-7.5), int(2)).unwrap(), float(-4.0));
    }

    #[test]
    fn test_modulo_follows_divisor_sign() {
        assert_eq!(Operator::Modulo.apply(int(7), int(2)).unwrap(), int(1));
        assert_eq!(Operator::Modulo.apply(int(-7), int(2)).unwrap(), int(1));
        assert_eq!(Operator::Modulo.apply(int(7), int(-2)).unwrap(), int(-1));
        assert_eq!(Operator::Modulo.apply(float(5.5), int(2)).unwrap(), float(1.5));
        assert_eq!(Operator::Modulo.apply(float(-5.5), int(2)).unwrap(), float(0.5));
        assert_eq!(Operator::Modulo.apply(int(i64::MIN), int(-1)).unwrap(), int(0));
    }

    #[test]
    fn test_zero_divisors() {
        for op in [Operator::Divide, Operator::FloorDivide, Operator::Modulo] {
            let err = op.apply(int(1), int(0)).unwrap_err();
            assert_eq!(err.kind(), "division_by_zero", "operator {op}");
            let err = op.apply(float(1.0), float(0.0)).unwrap_err();
            assert_eq!(err.kind(), "division_by_zero", "operator {op}");
        }
        assert_eq!(Operator::Power.apply(int(0), int(-1)).unwrap_err().kind(), "division_by_zero");
    }

    #[test]
    fn test_power_edge_cases() {
        assert!(matches!(Operator::Power.apply(int(2), int(-1)), Ok(Number::Float(f)) if f == 0.5));
        assert_eq!(Operator::Power.apply(int(-1), int(i64::MAX)).unwrap(), int(-1));
        assert_eq!(Operator::Power.apply(int(2), int(64)).unwrap_err().kind(), "arithmetic_overflow");
        assert_eq!(Operator::Power.apply(float(-8.0), float(0.5)).unwrap_err().kind(), "domain_error");
        assert_eq!(Operator::Power.apply(float(10.0), int(400)).unwrap_err().kind(), "arithmetic_overflow");
    }

    #[test]
    fn test_integer_overflow_is_reported() {
        let err = Operator::Add.apply(int(i64::MAX), int(1)).unwrap_err();
        assert_eq!(err, CalculationError::ArithmeticOverflow { operator: "+".to_string() });
        assert!(Operator::FloorDivide.apply(int(i64::MIN), int(-1)).is_err());
    }

    #[test]
    fn test_fold_is_left_associative() {
        let sub = Operator::Subtract.reducer();
        assert_eq!(fold(sub, &[int(10), int(2), int(3)]).unwrap(), int(5));

        let pow = Operator::Power.reducer();
        assert_eq!(fold(pow, &[int(2), int(3), int(2)]).unwrap(), int(64));

        assert_eq!(fold(sub, &[int(9)]).unwrap(), int(9));
        assert!(fold(sub, &[]).is_err());
    }

    #[test]
    fn test_fold_stops_at_first_error() {
        let div = Operator::Divide.reducer();
        let err = fold(div, &[int(8), int(0), int(2)]).unwrap_err();
        assert_eq!(err.kind(), "division_by_zero");
    }

    #[test]
    fn test_standard_table() {
        let table = OperatorTable::standard();
        assert_eq!(table.len(), 7);
        assert_eq!(table.symbols(), vec!["%", "*", "**", "+", "-", "/", "//"]);
        assert!(table.contains("//"));
        assert!(table.get("^").is_none());
    }

    #[test]
    fn test_custom_table() {
        fn max(a: Number, b: Number) -> CalculationResult {
            Ok(if b > a { b } else { a })
        }

        let table = OperatorTable::builder().with("max", max).with("+", add).build();
        assert_eq!(table.symbols(), vec!["+", "max"]);
        let reducer = table.get("max").unwrap();
        assert_eq!(fold(reducer, &[int(3), int(9), int(4)]).unwrap(), int(9));
    }
}
