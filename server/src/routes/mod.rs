//! HTTP route definitions.

mod books;
mod health;

use crate::error::AppError;
use crate::AppState;
use axum::Router;
use lending_engine::BookStore;

/// Create all application routes.
pub fn create_routes<S>() -> Router<AppState<S>>
where
    S: BookStore,
    AppError: From<S::Error>,
{
    Router::new()
        .merge(health::routes::<AppState<S>>())
        .merge(books::routes::<S>())
}
