//! Premium estimate handlers

use axum::{extract::{Path, State}, Json};

use crate::{AppState, error::ApiError};
use crate::dto::{EstimateResponse, QuoteResponse};
use crate::handlers::parse_user;

/// Live estimate of the current form; does not count as a quote
pub async fn get_estimate(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<EstimateResponse>, ApiError> {
    let user = parse_user(&user_id)?;
    Ok(Json(state.service.preview(&user).await.into()))
}

/// Computes the quote shown on the final step and records its time
pub async fn create_quote(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let user = parse_user(&user_id)?;
    Ok(Json(state.service.estimate(&user).await.into()))
}
