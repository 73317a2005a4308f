use axum::{routing::get, routing::post, Router};

use crate::http::handlers;
use crate::AppState;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn api() -> Router<AppState> {
    Router::new()
        .route("/api/image-upload", post(handlers::upload_image))
        .route("/api/video-upload", post(handlers::upload_video))
        .route("/api/videos", get(handlers::list_videos))
        .route("/api/social-formats", get(handlers::list_social_formats))
        .route("/api/image-url", get(handlers::image_url))
}
