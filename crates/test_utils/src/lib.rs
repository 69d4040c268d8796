//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! motor quotation test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data (instants, users, complete forms)
//! - `builders`: Builder patterns for form data and saved quotes
//! - `assertions`: Custom assertion helpers for premiums and breakdowns
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
