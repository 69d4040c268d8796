//! Form session handlers

use axum::{extract::{Path, State}, Json};

use domain_quote::{FormData, SummaryItem};

use crate::{AppState, error::ApiError};
use crate::dto::SessionResponse;
use crate::handlers::parse_user;

/// Loads the user's form, or a blank one
pub async fn get_session(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let user = parse_user(&user_id)?;
    Ok(Json(state.service.open_session(&user).await.into()))
}

/// Merges the given fields into the form; empty values are ignored
pub async fn update_session(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(fields): Json<FormData>,
) -> Result<Json<SessionResponse>, ApiError> {
    let user = parse_user(&user_id)?;
    Ok(Json(state.service.update_fields(&user, &fields).await.into()))
}

/// Advances a step, or returns the current step's validation errors
pub async fn next_step(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let user = parse_user(&user_id)?;
    Ok(Json(state.service.next_step(&user).await?.into()))
}

pub async fn previous_step(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let user = parse_user(&user_id)?;
    Ok(Json(state.service.previous_step(&user).await.into()))
}

/// Jumps back to a visited step from the summary panel
pub async fn jump_to(
    State(state): State<AppState>,
    Path((user_id, step)): Path<(String, u8)>,
) -> Result<Json<SessionResponse>, ApiError> {
    let user = parse_user(&user_id)?;
    Ok(Json(state.service.jump_to(&user, step).await?.into()))
}

/// Starts a new quote
pub async fn reset_session(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let user = parse_user(&user_id)?;
    Ok(Json(state.service.reset(&user).await.into()))
}

pub async fn get_summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<SummaryItem>>, ApiError> {
    let user = parse_user(&user_id)?;
    Ok(Json(state.service.summary(&user).await))
}
