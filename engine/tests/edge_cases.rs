//! Edge case tests for lending-engine
//!
//! These tests drive the library end to end over the in-memory store,
//! including concurrent loans against a single book.

use lending_engine::{
    Book, BookStore, CreateBookRequest, Error, ErrorKind, Library, LoanRequest, MemoryStore,
};

async fn create(library: &Library<MemoryStore>, serial: &str) -> Book {
    library
        .create_book(CreateBookRequest::new(serial, "Test Book", "Test Author"))
        .await
        .unwrap()
}

// ============================================================================
// Full workflow
// ============================================================================

#[tokio::test]
async fn create_borrow_return_delete() {
    let library = Library::new(MemoryStore::new());

    let book = library
        .create_book(CreateBookRequest::new("111111", "New Book", "New Author"))
        .await
        .unwrap();
    assert_eq!(book.serial, "111111");
    assert!(!book.is_borrowed);

    let before = chrono::Utc::now();
    let borrowed = library
        .apply_loan("111111", LoanRequest::borrow("888888"))
        .await
        .unwrap();
    let after = chrono::Utc::now();

    assert!(borrowed.is_borrowed);
    assert_eq!(borrowed.borrowed_by.as_deref(), Some("888888"));
    let at = borrowed.borrowed_at.unwrap();
    assert!(before <= at && at <= after);

    let returned = library
        .apply_loan("111111", LoanRequest::return_book())
        .await
        .unwrap();
    assert!(!returned.is_borrowed);
    assert_eq!(returned.borrowed_by, None);
    assert_eq!(returned.borrowed_at, None);

    library.delete_book("111111").await.unwrap();
    assert!(library.list_books().await.unwrap().is_empty());
}

// ============================================================================
// Validation Edge Cases
// ============================================================================

#[tokio::test]
async fn malformed_serials_rejected() {
    let library = Library::new(MemoryStore::new());

    for serial in ["", "12345", "1234567", "abc123", "12 456", "１２３４５６"] {
        let err = library
            .create_book(CreateBookRequest::new(serial, "Title", "Author"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "accepted: {:?}", serial);
    }

    assert!(library.list_books().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_title_rejected() {
    let library = Library::new(MemoryStore::new());
    let request = CreateBookRequest {
        serial: Some("123456".into()),
        title: None,
        author: Some("Author".into()),
    };

    let err = library.create_book(request).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn inconsistent_loan_requests_rejected() {
    let library = Library::new(MemoryStore::new());
    create(&library, "123456").await;

    let borrow_without_card = LoanRequest {
        action: Some("borrow".into()),
        card_number: None,
    };
    let return_with_card = LoanRequest {
        action: Some("return".into()),
        card_number: Some("654321".into()),
    };

    for request in [borrow_without_card, return_with_card] {
        let err = library.apply_loan("123456", request).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    let book = library.get_book("123456").await.unwrap();
    assert!(!book.is_borrowed);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_borrows_single_winner() {
    let library = Library::new(MemoryStore::new());
    create(&library, "123456").await;

    let mut handles = Vec::new();
    for i in 0..32 {
        let library = library.clone();
        handles.push(tokio::spawn(async move {
            let card = format!("{:06}", 100000 + i);
            library
                .apply_loan("123456", LoanRequest::borrow(card))
                .await
        }));
    }

    let mut winners = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(book) => winners.push(book),
            Err(err) => assert_eq!(err, Error::AlreadyBorrowed("123456".into())),
        }
    }

    assert_eq!(winners.len(), 1);
    let stored = library.store().get("123456").await.unwrap().unwrap();
    assert_eq!(stored, winners[0]);
    assert!(stored.is_consistent());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_loans_on_distinct_books() {
    let library = Library::new(MemoryStore::new());
    for i in 0..16 {
        create(&library, &format!("{:06}", i)).await;
    }

    let mut handles = Vec::new();
    for i in 0..16 {
        let library = library.clone();
        handles.push(tokio::spawn(async move {
            let serial = format!("{:06}", i);
            library
                .apply_loan(&serial, LoanRequest::borrow("654321"))
                .await
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    let books = library.list_books().await.unwrap();
    assert_eq!(books.len(), 16);
    assert!(books.iter().all(|b| b.is_borrowed && b.is_consistent()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn interleaved_borrow_and_return_stay_consistent() {
    let library = Library::new(MemoryStore::new());
    create(&library, "123456").await;

    let mut handles = Vec::new();
    for i in 0..64 {
        let library = library.clone();
        handles.push(tokio::spawn(async move {
            let request = if i % 2 == 0 {
                LoanRequest::borrow("654321")
            } else {
                LoanRequest::return_book()
            };
            let _ = library.apply_loan("123456", request).await;
            let book = library.get_book("123456").await.unwrap();
            assert!(book.is_consistent());
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }
}
