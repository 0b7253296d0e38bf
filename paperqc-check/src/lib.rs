//! paperqc-check library interface
//!
//! Exposes the pipeline, checkers, and router so integration tests can
//! drive the service without a running binary.

pub mod api;
pub mod checkers;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod similarity;

pub use crate::error::{ApiError, ApiResult};

use crate::pipeline::CheckOrchestrator;
use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Check pipeline orchestrator
    pub orchestrator: Arc<CheckOrchestrator>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, orchestrator: Arc<CheckOrchestrator>) -> Self {
        Self {
            db,
            orchestrator,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::check_routes())
        .merge(api::health_routes())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
