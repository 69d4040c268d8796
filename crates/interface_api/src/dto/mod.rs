//! Request/response data transfer objects

pub mod quote;
pub mod session;
pub mod validate;

pub use quote::{EstimateResponse, QuoteResponse, SaveQuoteRequest};
pub use session::SessionResponse;
pub use validate::ValidateFieldRequest;
