//! HTTP API Layer
//!
//! This crate provides the REST API for the motor quotation form using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for sessions, estimates, saved quotes and validation
//! - **Middleware**: Request ids, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent JSON error responses
//!
//! # Routes
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET | `/health`, `/health/ready` | liveness and storage readiness |
//! | GET/PATCH/DELETE | `/api/v1/users/:user_id/session` | load, update, reset the form |
//! | POST | `/api/v1/users/:user_id/session/next`, `/previous`, `/jump/:step` | navigation |
//! | GET | `/api/v1/users/:user_id/summary` | summary panel |
//! | GET | `/api/v1/users/:user_id/estimate` | live premium breakdown |
//! | POST | `/api/v1/users/:user_id/quote` | final quote, recorded for loyalty |
//! | GET/POST | `/api/v1/users/:user_id/quotes` | list and save quotes |
//! | POST | `/api/v1/users/:user_id/quotes/:quote_id/load` | restore a saved quote |
//! | POST | `/api/v1/validate` | single-field validation |
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::bootstrap(config).await?;
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use domain_quote::{PremiumEstimator, QuotationService};
use infra_store::{open_store, QuoteStorage};

use crate::config::ApiConfig;
use crate::error::StartupError;
use crate::handlers::{estimate, health, quotes, session, validate};
use crate::middleware::audit_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QuotationService>,
    pub storage: QuoteStorage,
    pub config: ApiConfig,
}

impl AppState {
    /// Wires a service over the given storage
    pub fn new(config: ApiConfig, storage: QuoteStorage, estimator: PremiumEstimator) -> Self {
        let service = QuotationService::new(
            estimator,
            Arc::new(storage.sessions()),
            Arc::new(storage.quotes()),
            Arc::new(storage.loyalty()),
        );
        Self {
            service: Arc::new(service),
            storage,
            config,
        }
    }

    /// Opens the configured store and rate table
    pub async fn bootstrap(config: ApiConfig) -> Result<Self, StartupError> {
        let rates = config.rate_table()?;
        let store = open_store(&config.store_config()).await?;
        info!(
            base_premium = %rates.base_premium,
            minimum_premium = %rates.minimum_premium,
            "Rate table loaded"
        );
        Ok(Self::new(config, QuoteStorage::new(store), PremiumEstimator::new(rates)))
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Form session routes
    let user_routes = Router::new()
        .route(
            "/session",
            get(session::get_session)
                .patch(session::update_session)
                .delete(session::reset_session),
        )
        .route("/session/next", post(session::next_step))
        .route("/session/previous", post(session::previous_step))
        .route("/session/jump/:step", post(session::jump_to))
        .route("/summary", get(session::get_summary))
        .route("/estimate", get(estimate::get_estimate))
        .route("/quote", post(estimate::create_quote))
        .route("/quotes", get(quotes::list_quotes).post(quotes::save_quote))
        .route("/quotes/:quote_id/load", post(quotes::load_quote));

    let api_routes = Router::new()
        .nest("/users/:user_id", user_routes)
        .route("/validate", post(validate::validate_field))
        .layer(axum_middleware::from_fn(audit_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
