//! Loan state machine.
//!
//! A book is either `Available` or `Borrowed`. Borrowing is only legal from
//! `Available`, returning only from `Borrowed`. Transitions never mutate
//! their input: they return a full replacement book for the store to persist.

use crate::{
    book::Book,
    error::{Error, Result},
    CardNumber, Timestamp,
};

/// A loan action as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanAction {
    Borrow,
    Return,
}

/// A validated loan request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoanCommand {
    /// Lend the book to the holder of `card_number`
    Borrow { card_number: CardNumber },
    /// Put the book back on the shelf
    Return,
}

/// Compute the book that results from applying `command` at time `now`.
///
/// Fails with a conflict if the book is not in the state the command
/// requires; the input book is left as it was.
pub fn transition(book: &Book, command: &LoanCommand, now: Timestamp) -> Result<Book> {
    match (command, book.is_borrowed) {
        (LoanCommand::Borrow { card_number }, false) => Ok(Book {
            is_borrowed: true,
            borrowed_by: Some(card_number.clone()),
            borrowed_at: Some(now),
            ..book.clone()
        }),
        (LoanCommand::Borrow { .. }, true) => Err(Error::AlreadyBorrowed(book.serial.clone())),
        (LoanCommand::Return, true) => Ok(Book {
            is_borrowed: false,
            borrowed_by: None,
            borrowed_at: None,
            ..book.clone()
        }),
        (LoanCommand::Return, false) => Err(Error::NotBorrowed(book.serial.clone())),
    }
}
