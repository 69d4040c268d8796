//! Quotation domain errors
//!
//! Malformed form input is never an error here: the estimator neutralizes it
//! and the validators report it as structured results. These variants cover
//! navigation refusals, configuration problems and storage failures.

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur in the quotation domain
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The current step has invalid or missing input
    #[error("Step {step} is incomplete: {}", errors.join("; "))]
    IncompleteStep {
        step: u8,
        errors: Vec<String>,
    },

    /// Navigation to a step that is out of range or not yet visited
    #[error("Invalid step: {0}")]
    InvalidStep(u8),

    /// Stored session record was written by a different form version
    #[error("Session version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        expected: String,
        found: String,
    },

    /// Rate table failed validation or could not be read
    #[error("Invalid rate table: {0}")]
    InvalidRateTable(String),

    /// Saved quote not found for the user
    #[error("Saved quote not found: {0}")]
    QuoteNotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage port error
    #[error(transparent)]
    Port(#[from] PortError),
}

impl QuoteError {
    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        QuoteError::Validation(message.into())
    }

    /// Creates an invalid rate table error
    pub fn invalid_rate_table(message: impl Into<String>) -> Self {
        QuoteError::InvalidRateTable(message.into())
    }
}
