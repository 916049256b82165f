//! Book records and their loan state.

use crate::{CardNumber, Serial, Timestamp};
use serde::{Deserialize, Serialize};

/// A validated request to add a book to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub serial: Serial,
    pub title: String,
    pub author: String,
}

/// Loan state of a book, derived from its loan fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoanState {
    /// On the shelf
    Available,
    /// Lent out to a card holder since the given time
    Borrowed {
        card_number: CardNumber,
        since: Timestamp,
    },
}

/// A book in the catalog.
///
/// The loan fields move together: `is_borrowed` is true exactly when both
/// `borrowed_by` and `borrowed_at` are set. Only [`crate::loan::transition`]
/// produces borrowed books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Six-digit catalog serial, immutable once created
    pub serial: Serial,
    pub title: String,
    pub author: String,
    /// Whether the book is currently lent out
    pub is_borrowed: bool,
    /// Card number of the borrower
    pub borrowed_by: Option<CardNumber>,
    /// When the current loan started
    pub borrowed_at: Option<Timestamp>,
}

impl Book {
    /// Create an available book from a validated request.
    pub fn new(new_book: NewBook) -> Self {
        Self {
            serial: new_book.serial,
            title: new_book.title,
            author: new_book.author,
            is_borrowed: false,
            borrowed_by: None,
            borrowed_at: None,
        }
    }

    /// Derive the loan state from the stored fields.
    ///
    /// Returns `None` when the loan fields disagree with each other.
    pub fn loan_state(&self) -> Option<LoanState> {
        match (self.is_borrowed, &self.borrowed_by, self.borrowed_at) {
            (false, None, None) => Some(LoanState::Available),
            (true, Some(card_number), Some(since)) => Some(LoanState::Borrowed {
                card_number: card_number.clone(),
                since,
            }),
            _ => None,
        }
    }

    /// Check that the loan fields are consistent.
    pub fn is_consistent(&self) -> bool {
        self.loan_state().is_some()
    }
}
