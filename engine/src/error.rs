//! Error types for the lending engine.

use crate::Serial;
use thiserror::Error;

/// Broad classification of an [`Error`], used by callers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or inconsistent input, rejected before touching the store.
    Validation,
    /// Structurally valid request that violates the current state.
    Conflict,
    /// The referenced serial does not exist.
    NotFound,
}

/// Input rejected by a request validator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field required: {0}")]
    MissingField(&'static str),

    #[error("Serial must be exactly 6 digits, got '{0}'")]
    InvalidSerial(String),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("{0} must not contain NUL characters")]
    NulCharacter(&'static str),

    #[error("Action must be 'borrow' or 'return', got '{0}'")]
    InvalidAction(String),

    #[error("Card number must be exactly 6 digits, got '{0}'")]
    InvalidCardNumber(String),

    #[error("Card number is required for borrow action")]
    CardNumberRequired,

    #[error("Card number is not allowed for return action")]
    CardNumberNotAllowed,
}

/// All possible errors from the lending engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Book with serial number {0} already exists")]
    AlreadyExists(Serial),

    #[error("Book with serial number {0} is already borrowed")]
    AlreadyBorrowed(Serial),

    #[error("Book with serial number {0} is not currently borrowed")]
    NotBorrowed(Serial),

    #[error("Book with serial number {0} not found")]
    NotFound(Serial),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::AlreadyExists(_) | Error::AlreadyBorrowed(_) | Error::NotBorrowed(_) => {
                ErrorKind::Conflict
            }
            Error::NotFound(_) => ErrorKind::NotFound,
        }
    }
}

/// Result type for engine operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
