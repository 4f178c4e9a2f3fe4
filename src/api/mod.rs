pub mod health;
pub mod points;

use crate::orchestration::PointsPipeline;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PointsPipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<PointsPipeline>) -> Self {
        Self { pipeline }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/points", get(points::get_points))
        .layer(cors)
        .with_state(state)
}
