pub mod appresult;
pub mod config;
pub mod db;
pub mod dogs;
pub mod likes;
pub mod matches;
pub mod res;
pub mod seed;

use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use appresult::{AppError, AppResult};
pub use config::Config;
pub use db::Store;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: Store,
}

pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(dogs::router())
        .route("/like", post(likes::like))
        .route("/matches/{dog_id}", get(matches::matches))
        .route("/seed", post(seed::seed))
}

/// The whole service: JSON API under `/api`, the static front end everywhere else.
pub fn app(state: AppState, config: &Config) -> Router {
    Router::new()
        .nest("/api", api_router())
        .fallback_service(res::public(&config.public_dir))
        .layer(DefaultBodyLimit::max(config.body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
