//! Request handlers

pub mod estimate;
pub mod health;
pub mod quotes;
pub mod session;
pub mod validate;

use core_kernel::UserId;

use crate::error::ApiError;

/// Parses the `:user_id` path segment
pub(crate) fn parse_user(raw: &str) -> Result<UserId, ApiError> {
    Ok(UserId::parse(raw)?)
}
