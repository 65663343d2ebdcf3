#![deny(warnings)]
//! Audited evaluation for Abacus calculators.
//!
//! This crate layers operation logging on top of `abacus-calculator`: every
//! call made through an [`AuditedCalculator`] is described in a [`LogEntry`]
//! and appended to a [`LogBuffer`], which writes its contents to a sink once
//! it reaches the configured threshold.

use std::sync::Arc;
use tracing::{debug, instrument};

/// Operation auditing and the audited calculator wrapper
pub mod audit;
/// Ordered operation log with threshold flushing
pub mod buffer;
/// File and environment configuration for the audit layer
pub mod config;
/// Log entry formatting
pub mod entry;
pub mod error;
/// Flush destinations
pub mod sink;

pub use abacus_calculator::{
    CalculationError, Calculator, Calculators, FactoryError, Number, SimpleCalculator,
};
pub use audit::{AuditOutcome, Audited, AuditedCalculator, Auditor, CompatValue};
pub use buffer::{DEFAULT_FLUSH_THRESHOLD, FlushPolicy, LogBuffer};
pub use config::{AuditConfig, SinkKind};
pub use entry::{ArgValue, CallArgs, LogEntry};
pub use error::ConfigError;
pub use sink::{ConsoleSink, LogSink, MemorySink, NullSink, TracingSink};

/// Builds an audited calculator of `kind` that logs into `buffer`.
#[instrument(skip(buffer))]
pub fn audited_calculator(
    kind: &str,
    buffer: Arc<LogBuffer>,
) -> Result<AuditedCalculator<Box<dyn Calculator>>, FactoryError> {
    debug!("Wrapping calculator with audit log");
    AuditedCalculator::from_kind(kind, buffer)
}
