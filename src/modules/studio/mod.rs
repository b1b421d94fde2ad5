use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower_http::services::ServeDir;

pub mod dto;
pub mod handler;
pub mod page;
pub mod service;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handler::index))
        .route("/generate", post(handler::generate))
        .route("/health", get(handler::health))
        .nest_service("/outputs", ServeDir::new(&state.config.output_dir))
}
