//! Operation auditing
//!
//! [`Auditor`] runs a call, turns its outcome into a [`LogEntry`] and appends
//! it to a [`LogBuffer`]. Failures are logged and handed back as data rather
//! than propagated, so the caller decides whether an error is fatal.
//! [`AuditedCalculator`] applies the auditor to every `calculate` call of the
//! calculator it wraps.

use crate::buffer::LogBuffer;
use crate::entry::{CallArgs, LogEntry};
use abacus_calculator::{CalculationError, Calculator, Calculators, FactoryError};
use abacus_types::Number;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Operation name recorded for calculator evaluations.
pub const CALCULATE: &str = "calculate";

/// Outcome of an audited call: the value, or the error plus its log description.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Audited<T, E> {
    Success { value: T },
    Failure { error: E, description: String },
}

/// Outcome of an audited `calculate`.
pub type AuditOutcome = Audited<Number, CalculationError>;

impl<T, E> Audited<T, E> {
    pub fn is_success(&self) -> bool {
        matches!(self, Audited::Success { .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Audited::Success { value } => Some(value),
            Audited::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Audited::Success { .. } => None,
            Audited::Failure { error, .. } => Some(error),
        }
    }

    /// The logged failure text, if the call failed.
    pub fn description(&self) -> Option<&str> {
        match self {
            Audited::Success { .. } => None,
            Audited::Failure { description, .. } => Some(description),
        }
    }

    pub fn into_result(self) -> Result<T, E> {
        match self {
            Audited::Success { value } => Ok(value),
            Audited::Failure { error, .. } => Err(error),
        }
    }

    /// Collapses the outcome the lenient way: a failure becomes its description.
    pub fn into_compat(self) -> CompatValue<T> {
        match self {
            Audited::Success { value } => CompatValue::Value(value),
            Audited::Failure { description, .. } => CompatValue::Text(description),
        }
    }
}

/// Either a real result or the description of a swallowed failure.
///
/// Both render through `Display`, so a caller that only prints the result
/// cannot tell them apart; match on the variant when that matters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CompatValue<T> {
    Value(T),
    Text(String),
}

impl<T: fmt::Display> fmt::Display for CompatValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompatValue::Value(value) => write!(f, "{value}"),
            CompatValue::Text(text) => f.write_str(text),
        }
    }
}

/// Records the outcome of each call it wraps.
#[derive(Debug, Clone)]
pub struct Auditor {
    buffer: Arc<LogBuffer>,
}

impl Auditor {
    pub fn new(buffer: Arc<LogBuffer>) -> Self {
        Self { buffer }
    }

    pub fn buffer(&self) -> &Arc<LogBuffer> {
        &self.buffer
    }

    /// Runs `call`, logs a success or failure entry for it and returns the outcome.
    /// The success value is passed through untouched.
    pub fn audit<T, E, F>(&self, operation: &str, args: &CallArgs, call: F) -> Audited<T, E>
    where
        T: fmt::Display,
        E: fmt::Display,
        F: FnOnce() -> Result<T, E>,
    {
        match call() {
            Ok(value) => {
                debug!(operation, result = %value, "audited call succeeded");
                self.buffer.append(LogEntry::success(operation, args, &value));
                Audited::Success { value }
            }
            Err(error) => {
                let entry = LogEntry::failure(operation, &error, args);
                debug!(operation, %error, "audited call failed");
                let description = entry.as_str().to_string();
                self.buffer.append(entry);
                Audited::Failure { error, description }
            }
        }
    }
}

/// A calculator whose every evaluation goes through an [`Auditor`].
pub struct AuditedCalculator<C> {
    inner: C,
    auditor: Auditor,
}

impl<C: Calculator> AuditedCalculator<C> {
    pub fn new(inner: C, buffer: Arc<LogBuffer>) -> Self {
        Self { inner, auditor: Auditor::new(buffer) }
    }

    /// Wraps `inner` and logs to [`LogBuffer::shared`].
    pub fn with_shared_log(inner: C) -> Self {
        Self::new(inner, LogBuffer::shared())
    }

    pub fn calculate(&self, operator: &str, operands: &[Number]) -> AuditOutcome {
        let args = CallArgs::for_calculation(operator, operands);
        self.auditor.audit(CALCULATE, &args, || self.inner.calculate(operator, operands))
    }

    /// Like [`calculate`](Self::calculate) but a failure comes back as its
    /// description text instead of a typed error.
    pub fn calculate_compat(&self, operator: &str, operands: &[Number]) -> CompatValue<Number> {
        self.calculate(operator, operands).into_compat()
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn auditor(&self) -> &Auditor {
        &self.auditor
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl AuditedCalculator<Box<dyn Calculator>> {
    /// Builds a calculator through the factory and wraps it. Factory errors are
    /// returned directly and never logged.
    pub fn from_kind(kind: &str, buffer: Arc<LogBuffer>) -> Result<Self, FactoryError> {
        Ok(Self::new(Calculators::get_calculator(kind)?, buffer))
    }
}

impl<C: Calculator> fmt::Debug for AuditedCalculator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditedCalculator")
            .field("kind", &self.inner.kind())
            .field("auditor", &self.auditor)
            .finish()
    }
}
