//! Library - catalog and loan operations over an injected store.

use crate::{
    book::Book,
    error::{Error, Result},
    loan,
    store::BookStore,
    validate::{self, CreateBookRequest, LoanRequest},
    Timestamp,
};

/// Source of the current time for loan transitions.
pub type Clock = fn() -> Timestamp;

/// Catalog operations: validate requests, run loan transitions and persist
/// the results through the store.
#[derive(Debug, Clone)]
pub struct Library<S> {
    store: S,
    clock: Clock,
}

impl<S: BookStore> Library<S> {
    /// Create a library over `store`, stamping loans with the system clock.
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: chrono::Utc::now,
        }
    }

    /// Replace the clock used to stamp new loans.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate and add a new, available book.
    pub async fn create_book(&self, request: CreateBookRequest) -> Result<Book, S::Error> {
        let new_book = validate::validate_create(request).map_err(Error::from)?;
        self.store.create(Book::new(new_book)).await
    }

    /// All books in the catalog.
    pub async fn list_books(&self) -> Result<Vec<Book>, S::Error> {
        self.store.list().await
    }

    /// Fetch one book.
    pub async fn get_book(&self, serial: &str) -> Result<Book, S::Error> {
        self.store
            .get(serial)
            .await?
            .ok_or_else(|| Error::NotFound(serial.to_string()).into())
    }

    /// Remove a book regardless of its loan state.
    pub async fn delete_book(&self, serial: &str) -> Result<(), S::Error> {
        if self.store.delete(serial).await? {
            Ok(())
        } else {
            Err(Error::NotFound(serial.to_string()).into())
        }
    }

    /// Validate a loan request and apply it to the book with `serial`.
    ///
    /// The request is validated before the store is touched. A missing book
    /// is reported before any state check.
    pub async fn apply_loan(&self, serial: &str, request: LoanRequest) -> Result<Book, S::Error> {
        let command = validate::validate_loan(request).map_err(Error::from)?;
        let now = (self.clock)();

        self.store
            .update(serial, move |book| loan::transition(book, &command, now))
            .await?
            .ok_or_else(|| Error::NotFound(serial.to_string()).into())
    }
}
