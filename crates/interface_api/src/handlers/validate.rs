//! Field validation handler

use axum::{extract::State, Json};
use validator::Validate;

use domain_quote::{FieldValidation, FormField};

use crate::{AppState, error::ApiError};
use crate::dto::ValidateFieldRequest;

/// Validates one field value as the user types
pub async fn validate_field(
    State(state): State<AppState>,
    Json(request): Json<ValidateFieldRequest>,
) -> Result<Json<FieldValidation>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let field: FormField = request.field.parse()?;
    Ok(Json(state.service.validate_field(field, &request.value)))
}
