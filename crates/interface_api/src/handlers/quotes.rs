//! Saved quote handlers

use axum::{extract::{Path, State}, http::StatusCode, Json};

use core_kernel::QuoteId;
use domain_quote::SavedQuote;

use crate::{AppState, error::ApiError};
use crate::dto::{SaveQuoteRequest, SessionResponse};
use crate::handlers::parse_user;

/// Saves a quote for the current form; the body is optional
pub async fn save_quote(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    request: Option<Json<SaveQuoteRequest>>,
) -> Result<(StatusCode, Json<SavedQuote>), ApiError> {
    let user = parse_user(&user_id)?;
    let request = request.map(|Json(request)| request).unwrap_or_default();
    let saved = state.service.save_quote(&user, request.status).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Lists saved quotes, most recent first
pub async fn list_quotes(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<SavedQuote>>, ApiError> {
    let user = parse_user(&user_id)?;
    Ok(Json(state.service.saved_quotes(&user).await?))
}

/// Restores a saved quote into the form
pub async fn load_quote(
    State(state): State<AppState>,
    Path((user_id, quote_id)): Path<(String, String)>,
) -> Result<Json<SessionResponse>, ApiError> {
    let user = parse_user(&user_id)?;
    let quote_id: QuoteId = quote_id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid quote id: {}", quote_id)))?;
    Ok(Json(state.service.load_saved_quote(&user, quote_id).await?.into()))
}
