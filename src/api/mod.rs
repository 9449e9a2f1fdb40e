//! API layer - HTTP handlers and routing
//!
//! Every endpoint lives under `/api/v1`:
//! - Contacts, plus the legacy `/contact` form endpoint
//! - Pages and posts, with lookup by slug
//! - Content and config entries, with lookup by key
//! - Health check

pub mod config;
pub mod contacts;
pub mod content;
pub mod health;
pub mod middleware;
pub mod pages;
pub mod posts;


use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use middleware::{ApiError, ApiJson, AppState};

/// Build the `/api/v1` routes
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .nest("/contacts", contacts::router())
        .nest("/contact", contacts::legacy_router())
        .nest("/pages", pages::router())
        .nest("/posts", posts::router())
        .nest("/content", content::router())
        .nest("/config", config::router())
        .route("/health", get(health::health))
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    Router::new()
        .nest("/api/v1", build_api_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_origin)),
        )
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    if origin == "*" {
        return cors.allow_origin(Any);
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => cors.allow_origin(value),
        Err(_) => {
            warn!("Invalid CORS origin '{}', allowing any origin", origin);
            cors.allow_origin(Any)
        }
    }
}
