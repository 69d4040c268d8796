//! Field validation DTOs

use serde::Deserialize;
use validator::Validate;

/// A single raw field value to check
#[derive(Debug, Deserialize, Validate)]
pub struct ValidateFieldRequest {
    /// Field name as it appears in form data, e.g. `driverAge`
    #[validate(length(min = 1, max = 64))]
    pub field: String,
    #[serde(default)]
    #[validate(length(max = 1024))]
    pub value: String,
}
