//! Book catalog and loan routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use lending_engine::{Book, BookStore, CreateBookRequest, LoanRequest};

use crate::error::{AppError, Result};
use crate::AppState;

/// Create book routes.
pub fn routes<S>() -> Router<AppState<S>>
where
    S: BookStore,
    AppError: From<S::Error>,
{
    Router::new()
        .route("/books", get(list_books::<S>).post(create_book::<S>))
        .route("/books/", get(list_books::<S>).post(create_book::<S>))
        .route(
            "/books/{serial}",
            get(get_book::<S>).delete(delete_book::<S>),
        )
        .route("/books/{serial}/loan", patch(loan_book::<S>))
}

/// GET /books/ - List all books.
async fn list_books<S>(State(state): State<AppState<S>>) -> Result<Json<Vec<Book>>>
where
    S: BookStore,
    AppError: From<S::Error>,
{
    let books = state.library.list_books().await?;
    Ok(Json(books))
}

/// POST /books/ - Add a book to the catalog.
async fn create_book<S>(
    State(state): State<AppState<S>>,
    payload: std::result::Result<Json<CreateBookRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>)>
where
    S: BookStore,
    AppError: From<S::Error>,
{
    let Json(request) = payload?;
    let book = state.library.create_book(request).await?;

    tracing::info!(serial = %book.serial, "Book created");
    Ok((StatusCode::CREATED, Json(book)))
}

/// GET /books/{serial} - Fetch one book.
async fn get_book<S>(
    State(state): State<AppState<S>>,
    Path(serial): Path<String>,
) -> Result<Json<Book>>
where
    S: BookStore,
    AppError: From<S::Error>,
{
    let book = state.library.get_book(&serial).await?;
    Ok(Json(book))
}

/// DELETE /books/{serial} - Remove a book in any loan state.
async fn delete_book<S>(
    State(state): State<AppState<S>>,
    Path(serial): Path<String>,
) -> Result<StatusCode>
where
    S: BookStore,
    AppError: From<S::Error>,
{
    state.library.delete_book(&serial).await?;

    tracing::info!(serial = %serial, "Book deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /books/{serial}/loan - Borrow or return a book.
async fn loan_book<S>(
    State(state): State<AppState<S>>,
    Path(serial): Path<String>,
    payload: std::result::Result<Json<LoanRequest>, JsonRejection>,
) -> Result<Json<Book>>
where
    S: BookStore,
    AppError: From<S::Error>,
{
    let Json(request) = payload?;
    let book = state.library.apply_loan(&serial, request).await?;

    tracing::info!(
        serial = %book.serial,
        is_borrowed = book.is_borrowed,
        borrowed_by = ?book.borrowed_by,
        "Loan updated"
    );
    Ok(Json(book))
}
