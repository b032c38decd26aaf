//! HTTP application wiring (Axum router + shared state).
//!
//! Layout:
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: response DTOs and JSON mapping
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use shelfcast_core::PipelineConfig;
use shelfcast_inventory::ReorderPolicy;

use crate::stores::StoreRegistry;

pub mod dto;
pub mod errors;
pub mod routes;

/// Shared, read-only state for all handlers. Cloned scalers/models never live
/// here; every request rebuilds its own pipeline.
#[derive(Debug, Clone)]
pub struct ApiState {
    pub registry: StoreRegistry,
    pub config: PipelineConfig,
    pub policy: ReorderPolicy,
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(registry: StoreRegistry) -> Router {
    let state = Arc::new(ApiState {
        registry,
        config: PipelineConfig::default(),
        policy: ReorderPolicy::default(),
    });

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(state))
}
