//! Humidex GWL Viewer Service Library
//!
//! HTTP surface over an in-memory [`HumidexDataset`](scenario_selector::HumidexDataset):
//! scenario listing, grid coordinates, and per-year humidex selections.

pub mod config;
pub mod handlers;
pub mod metrics;
pub mod state;

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the service router with its middleware stack.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Dataset queries
        .route("/api/scenarios", get(handlers::scenarios::scenarios_handler))
        .route(
            "/api/coordinates",
            get(handlers::scenarios::coordinates_handler),
        )
        .route("/api/selection", get(handlers::selection::selection_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
