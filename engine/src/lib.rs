//! # Lending Engine
//!
//! Catalog and loan logic for a library's book collection.
//!
//! The crate validates incoming requests, runs the borrow/return state
//! machine and persists results through a [`BookStore`]. It performs no
//! network or database I/O itself; the server crate supplies a PostgreSQL
//! store and the HTTP surface.
//!
//! ## Core Concepts
//!
//! ### Books
//!
//! A [`Book`] is identified by a six-digit serial and is either available or
//! borrowed. The loan fields (`is_borrowed`, `borrowed_by`, `borrowed_at`)
//! are always set or cleared together.
//!
//! ### Validation
//!
//! [`validate_create`] and [`validate_loan`] turn raw requests into
//! [`NewBook`] and [`LoanCommand`] values, or a [`ValidationError`].
//!
//! ### Loan transitions
//!
//! [`loan::transition`] computes the next book from the current one:
//! - borrow: `Available` to `Borrowed`, otherwise [`Error::AlreadyBorrowed`]
//! - return: `Borrowed` to `Available`, otherwise [`Error::NotBorrowed`]
//!
//! ### Stores
//!
//! [`BookStore::update`] applies a transition as one exclusive
//! read-modify-write per serial, so two concurrent borrows of the same book
//! cannot both succeed.
//!
//! ## Quick Start
//!
//! ```rust
//! use lending_engine::{CreateBookRequest, Library, LoanRequest, MemoryStore};
//!
//! # tokio_test();
//! # fn tokio_test() {
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let library = Library::new(MemoryStore::new());
//!
//! library
//!     .create_book(CreateBookRequest::new("111111", "New Book", "New Author"))
//!     .await
//!     .unwrap();
//!
//! let book = library
//!     .apply_loan("111111", LoanRequest::borrow("888888"))
//!     .await
//!     .unwrap();
//! assert!(book.is_borrowed);
//! assert_eq!(book.borrowed_by.as_deref(), Some("888888"));
//! # });
//! # }
//! ```

pub mod book;
pub mod error;
pub mod library;
pub mod loan;
pub mod store;
pub mod validate;

// Re-export main types at crate root
pub use book::{Book, LoanState, NewBook};
pub use error::{Error, ErrorKind, ValidationError};
pub use library::{Clock, Library};
pub use loan::{LoanAction, LoanCommand};
pub use store::{BookStore, MemoryStore};
pub use validate::{validate_create, validate_loan, CreateBookRequest, LoanRequest};

/// Type aliases for clarity
pub type Serial = String;
pub type CardNumber = String;
pub type Timestamp = chrono::DateTime<chrono::Utc>;
