//! Axum application setup
//!
//! Creates and configures the Axum application with routes and middleware.

use crate::{Result, config::Settings, resolver::LinkResolver};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Resolution engine
    pub resolver: Arc<LinkResolver>,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Wrap an existing resolver
    pub fn new(resolver: Arc<LinkResolver>) -> Self {
        Self {
            resolver,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Create the main Axum application with routes and middleware
pub fn create_app(settings: Settings) -> Result<Router> {
    let resolver = Arc::new(LinkResolver::new(settings)?);
    Ok(router(AppState::new(resolver)))
}

/// Build the router around prepared state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/proxy", get(super::handlers::proxy))
        .route("/ping", get(super::handlers::ping))
        .route(
            "/invalidate_caches",
            post(super::handlers::invalidate_caches),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
