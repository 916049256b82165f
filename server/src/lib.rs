//! Library lending server - HTTP API over the lending engine.
//!
//! Exposes the book catalog and loan transitions as JSON endpoints. Books are
//! stored in PostgreSQL ([`db::PgStore`]) or, for local runs and tests, in
//! process memory ([`lending_engine::MemoryStore`]).

pub mod config;
pub mod db;
pub mod error;
pub mod routes;

use crate::config::{Config, CorsOrigins};
use crate::error::AppError;
use axum::Router;
use lending_engine::{BookStore, Library};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState<S> {
    pub library: Library<S>,
    pub config: Arc<Config>,
}

impl<S: BookStore> AppState<S> {
    pub fn new(library: Library<S>, config: Config) -> Self {
        Self {
            library,
            config: Arc::new(config),
        }
    }
}

/// Build the CORS layer for the configured origins.
///
/// Credentials are only allowed for an explicit origin list; browsers reject
/// credentialed responses to a wildcard origin.
pub fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    match origins {
        CorsOrigins::Any => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsOrigins::List(list) => CorsLayer::new()
            .allow_origin(list.clone())
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true),
    }
}

/// Build the application router.
pub fn app<S>(state: AppState<S>) -> Router
where
    S: BookStore,
    AppError: From<S::Error>,
{
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .merge(routes::create_routes::<S>())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
