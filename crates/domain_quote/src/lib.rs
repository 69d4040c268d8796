//! Motor Quotation Domain
//!
//! This crate implements the multi-step motor insurance quotation form:
//! - **Form data**: a sparse, string-typed record built up across steps
//! - **Premium estimator**: a pure rule-based function from form data to an
//!   itemized premium in Kwacha
//! - **Rate table**: the rule set as validated, loadable data
//! - **Validation**: per-field and per-step checks returning structured results
//! - **Form session**: step navigation with a versioned durable record
//! - **Ports**: storage interfaces for sessions, saved quotes and loyalty
//! - **Service**: the quotation service wiring all of the above
//!
//! # Estimation
//!
//! ```text
//! FormData + EstimationContext --> PremiumEstimator --> PremiumBreakdown --> Quote
//!                                        ^
//!                                    RateTable
//! ```
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use domain_quote::{EstimationContext, FormData, FormField, PremiumEstimator};
//!
//! let mut form = FormData::new();
//! form.set(FormField::CoverageType, "third-party");
//! form.set(FormField::ExcessAmount, "1000");
//!
//! let breakdown = PremiumEstimator::default().estimate(&form, &EstimationContext::at(Utc::now()));
//! assert_eq!(breakdown.total, breakdown.recombine());
//! ```

pub mod breakdown;
pub mod error;
pub mod estimator;
pub mod form;
pub mod ports;
pub mod quote;
pub mod rating;
pub mod services;
pub mod session;
pub mod summary;
pub mod validation;

pub use breakdown::PremiumBreakdown;
pub use error::QuoteError;
pub use estimator::{EstimationContext, PremiumEstimator};
pub use form::{
    AccidentsBand, CoverageType, ExcessAmount, ExperienceBand, FormData, FormField,
    SecurityDevice, UsageType,
};
pub use ports::{LoyaltyPort, QuoteStorePort, SessionStorePort};
pub use quote::{Quote, QuoteStatus, SavedQuote, QUOTE_VALIDITY_DAYS};
pub use rating::RateTable;
pub use services::QuotationService;
pub use session::{FormSession, SessionRecord, Step, FORM_VERSION, TOTAL_STEPS};
pub use summary::{format_kwacha, summary_items, SummaryItem};
pub use validation::{FieldValidation, FormValidator, ValidationResult};
