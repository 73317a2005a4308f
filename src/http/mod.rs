use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::AppState;

mod auth;
mod error;
mod handlers;
pub mod middleware;
mod routes;

pub use auth::AuthUser;
pub use error::AppError;

pub fn router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.policy.request_body_limit());

    Router::new()
        .merge(routes::health())
        .merge(routes::api())
        .fallback(handlers::not_found)
        .layer(body_limit)
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::access::access_gate,
        ))
        .with_state(state)
}
