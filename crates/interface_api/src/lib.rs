//! HTTP API Layer
//!
//! This crate provides the REST API for the re-registration system using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for submission, retrieval, and the CPF
//!   uniqueness fast path
//! - **Middleware**: Request-id propagation, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(service, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_registration::SubmissionService;

use crate::config::ApiConfig;
use crate::handlers::{health, registration};
use crate::middleware::audit_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SubmissionService>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `service` - The submission service wired to its adapters
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(service: Arc<SubmissionService>, config: ApiConfig) -> Router {
    let state = AppState { service, config };

    // Public routes (no audit trail)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Registration routes
    let registration_routes = Router::new()
        .route("/", post(registration::submit_registration))
        .route("/:id", get(registration::get_registration))
        .route("/cpf/:cpf/exists", get(registration::cpf_exists));

    // Audited API routes
    let api_routes = Router::new()
        .nest("/registrations", registration_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            audit_middleware,
        ));

    // Combine all routes. The request id is generated outermost so both the
    // trace span and the audit line can carry it.
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
