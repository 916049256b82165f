//! Book record stores.
//!
//! [`BookStore`] is the persistence contract the [`crate::Library`] runs
//! against. The only operation with a concurrency guarantee is
//! [`BookStore::update`], which must run its read-modify-write exclusively
//! per serial. [`MemoryStore`] is the in-process implementation.

use crate::{
    error::{Error, Result},
    Book,
};
use dashmap::{mapref::entry::Entry, DashMap};
use std::{future::Future, sync::Arc};

/// Durable table of books keyed by serial.
pub trait BookStore: Clone + Send + Sync + 'static {
    /// Error type of the backend. Engine errors raised inside the store
    /// (duplicate serials, rejected transitions) convert into it.
    type Error: From<Error> + Send + 'static;

    /// Insert a new book. Fails with [`Error::AlreadyExists`] if the serial
    /// is taken; the existing row is not touched.
    fn create(&self, book: Book) -> impl Future<Output = Result<Book, Self::Error>> + Send;

    /// All books, ordered by serial.
    fn list(&self) -> impl Future<Output = Result<Vec<Book>, Self::Error>> + Send;

    /// Fetch a book by serial.
    fn get(&self, serial: &str) -> impl Future<Output = Result<Option<Book>, Self::Error>> + Send;

    /// Overwrite the row with the same serial. Returns `false` if there is
    /// no such row.
    fn replace(&self, book: Book) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Remove a book. Returns `false` if there was no such row.
    fn delete(&self, serial: &str) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Read the current row, compute its replacement with `f` and persist
    /// it, all as one step no other `update` on the same serial can
    /// interleave with.
    ///
    /// Returns `Ok(None)` if the serial is absent. If `f` fails nothing is
    /// written and its error is returned.
    fn update<F>(
        &self,
        serial: &str,
        f: F,
    ) -> impl Future<Output = Result<Option<Book>, Self::Error>> + Send
    where
        F: FnOnce(&Book) -> Result<Book> + Send;
}

/// In-memory book store.
///
/// Cheap to clone; clones share the same table. Each serial's
/// read-modify-write runs under that entry's write guard.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    books: Arc<DashMap<String, Book>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            books: Arc::new(DashMap::new()),
        }
    }

    /// Number of books.
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Check if the store holds no books.
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl BookStore for MemoryStore {
    type Error = Error;

    async fn create(&self, book: Book) -> Result<Book> {
        match self.books.entry(book.serial.clone()) {
            Entry::Occupied(_) => Err(Error::AlreadyExists(book.serial)),
            Entry::Vacant(slot) => {
                slot.insert(book.clone());
                Ok(book)
            }
        }
    }

    async fn list(&self) -> Result<Vec<Book>> {
        let mut books: Vec<Book> = self.books.iter().map(|r| r.value().clone()).collect();
        books.sort_by(|a, b| a.serial.cmp(&b.serial));
        Ok(books)
    }

    async fn get(&self, serial: &str) -> Result<Option<Book>> {
        Ok(self.books.get(serial).map(|r| r.value().clone()))
    }

    async fn replace(&self, book: Book) -> Result<bool> {
        match self.books.get_mut(&book.serial) {
            Some(mut row) => {
                *row = book;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, serial: &str) -> Result<bool> {
        Ok(self.books.remove(serial).is_some())
    }

    async fn update<F>(&self, serial: &str, f: F) -> Result<Option<Book>>
    where
        F: FnOnce(&Book) -> Result<Book> + Send,
    {
        let Some(mut row) = self.books.get_mut(serial) else {
            return Ok(None);
        };

        let next = f(row.value())?;
        debug_assert_eq!(next.serial, row.serial, "update must not change the serial");
        *row = next.clone();

        Ok(Some(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::NewBook;

    fn book(serial: &str) -> Book {
        Book::new(NewBook {
            serial: serial.into(),
            title: format!("Book {serial}"),
            author: "Author".into(),
        })
    }

    #[tokio::test]
    async fn create_and_get() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        let created = store.create(book("123456")).await.unwrap();
        assert_eq!(created, book("123456"));
        assert_eq!(store.get("123456").await.unwrap(), Some(book("123456")));
        assert_eq!(store.get("999999").await.unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_create_keeps_existing_row() {
        let store = MemoryStore::new();
        store.create(book("123456")).await.unwrap();

        let mut other = book("123456");
        other.title = "Another Book".into();
        let err = store.create(other).await.unwrap_err();

        assert_eq!(err, Error::AlreadyExists("123456".into()));
        let stored = store.get("123456").await.unwrap().unwrap();
        assert_eq!(stored.title, "Book 123456");
    }

    #[tokio::test]
    async fn list_is_ordered_by_serial() {
        let store = MemoryStore::new();
        for serial in ["300000", "100000", "200000"] {
            store.create(book(serial)).await.unwrap();
        }

        let serials: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.serial)
            .collect();
        assert_eq!(serials, vec!["100000", "200000", "300000"]);
    }

    #[tokio::test]
    async fn replace_and_delete() {
        let store = MemoryStore::new();
        assert!(!store.replace(book("123456")).await.unwrap());

        store.create(book("123456")).await.unwrap();
        let mut renamed = book("123456");
        renamed.title = "Renamed".into();
        assert!(store.replace(renamed).await.unwrap());
        assert_eq!(store.get("123456").await.unwrap().unwrap().title, "Renamed");

        assert!(store.delete("123456").await.unwrap());
        assert!(!store.delete("123456").await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_absent_serial() {
        let store = MemoryStore::new();
        let result = store.update("123456", |b| Ok(b.clone())).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn failed_update_writes_nothing() {
        let store = MemoryStore::new();
        store.create(book("123456")).await.unwrap();

        let err = store
            .update("123456", |b| Err(Error::NotBorrowed(b.serial.clone())))
            .await
            .unwrap_err();

        assert_eq!(err, Error::NotBorrowed("123456".into()));
        assert_eq!(store.get("123456").await.unwrap(), Some(book("123456")));
    }

    #[tokio::test]
    async fn clones_share_table() {
        let store = MemoryStore::new();
        let clone = store.clone();
        clone.create(book("123456")).await.unwrap();
        assert!(store.get("123456").await.unwrap().is_some());
    }
}
