#![deny(warnings)]
//! The calculator layer of Abacus.
//!
//! This crate provides the `Calculator` trait, the operator table with its
//! variadic left-fold evaluation, the `SimpleCalculator` built on top of it and
//! the `Calculators` factory that hands out instances by kind.

pub mod calculator;
pub mod error;
pub mod operator;
pub mod registry;

pub use abacus_types::Number;
pub use calculator::{Calculator, MIN_OPERANDS, SimpleCalculator};
pub use error::{CalculationError, CalculationResult, FactoryError};
pub use operator::{Operator, OperatorTable, OperatorTableBuilder, Reducer, fold};
pub use registry::{CalculatorConstructor, CalculatorRegistry, Calculators};
