//! Request validators.
//!
//! Incoming requests arrive with every field optional so that a missing field
//! is reported here rather than by the decoding layer. Validators are pure:
//! they look only at the request, never at stored state.
//!
//! Field checks run first. The loan request's cross-field rule runs last, as
//! a single match over the already-parsed action and card number, so the
//! error a caller sees does not depend on field order.

use crate::{
    book::NewBook,
    error::ValidationError,
    loan::{LoanAction, LoanCommand},
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of digits in a serial or card number.
const ID_LEN: usize = 6;

/// Request body for adding a book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBookRequest {
    pub serial: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
}

impl CreateBookRequest {
    pub fn new(
        serial: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            serial: Some(serial.into()),
            title: Some(title.into()),
            author: Some(author.into()),
        }
    }
}

/// Request body for borrowing or returning a book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub action: Option<String>,
    pub card_number: Option<String>,
}

impl LoanRequest {
    /// A borrow request for the given card.
    pub fn borrow(card_number: impl Into<String>) -> Self {
        Self {
            action: Some("borrow".into()),
            card_number: Some(card_number.into()),
        }
    }

    /// A return request.
    pub fn return_book() -> Self {
        Self {
            action: Some("return".into()),
            card_number: None,
        }
    }
}

/// True if `value` is exactly six ASCII digits.
fn is_six_digits(value: &str) -> bool {
    value.len() == ID_LEN && value.bytes().all(|b| b.is_ascii_digit())
}

/// Validate a serial number.
pub fn validate_serial(serial: &str) -> Result<(), ValidationError> {
    if is_six_digits(serial) {
        Ok(())
    } else {
        Err(ValidationError::InvalidSerial(serial.to_string()))
    }
}

/// Validate a borrower's card number.
pub fn validate_card_number(card_number: &str) -> Result<(), ValidationError> {
    if is_six_digits(card_number) {
        Ok(())
    } else {
        Err(ValidationError::InvalidCardNumber(card_number.to_string()))
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value.ok_or(ValidationError::MissingField(field))
}

/// Free text must be non-empty and free of NUL, which PostgreSQL text
/// columns cannot store.
fn text_field(value: String, field: &'static str) -> Result<String, ValidationError> {
    if value.is_empty() {
        Err(ValidationError::EmptyField(field))
    } else if value.contains('\0') {
        Err(ValidationError::NulCharacter(field))
    } else {
        Ok(value)
    }
}

/// Validate a create request.
pub fn validate_create(request: CreateBookRequest) -> Result<NewBook, ValidationError> {
    let serial = required(request.serial, "serial")?;
    let title = required(request.title, "title")?;
    let author = required(request.author, "author")?;

    validate_serial(&serial)?;
    let title = text_field(title, "title")?;
    let author = text_field(author, "author")?;

    Ok(NewBook {
        serial,
        title,
        author,
    })
}

impl FromStr for LoanAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "borrow" => Ok(LoanAction::Borrow),
            "return" => Ok(LoanAction::Return),
            other => Err(ValidationError::InvalidAction(other.to_string())),
        }
    }
}

/// Validate a loan request into a command for the state machine.
pub fn validate_loan(request: LoanRequest) -> Result<LoanCommand, ValidationError> {
    let action: LoanAction = required(request.action, "action")?.parse()?;

    if let Some(card_number) = &request.card_number {
        validate_card_number(card_number)?;
    }

    match (action, request.card_number) {
        (LoanAction::Borrow, Some(card_number)) => Ok(LoanCommand::Borrow { card_number }),
        (LoanAction::Borrow, None) => Err(ValidationError::CardNumberRequired),
        (LoanAction::Return, None) => Ok(LoanCommand::Return),
        (LoanAction::Return, Some(_)) => Err(ValidationError::CardNumberNotAllowed),
    }
}
