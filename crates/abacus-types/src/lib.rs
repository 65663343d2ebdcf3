//! Abacus Types
//!
//! This crate defines the numeric value shared by every crate in the Abacus
//! workspace (`abacus-calculator`, `abacus-core` and the `abacus` binary).
//! Keeping it separate lets the calculator and audit layers agree on one
//! representation without depending on each other.

#![deny(warnings)]
#![deny(clippy::all)]
#![deny(missing_docs)]

mod types;
pub use types::{Number, ParseNumberError};
