//! Database operations for the books table.

use crate::error::AppError;
use lending_engine::{Book, BookStore, Error};
use sqlx::{PgConnection, Row};

use super::Pool;

/// A stored book row from the database.
#[derive(Debug)]
pub struct StoredBook {
    pub serial: String,
    pub title: String,
    pub author: String,
    pub is_borrowed: bool,
    pub borrowed_by: Option<String>,
    pub borrowed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for StoredBook {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(StoredBook {
            serial: row.try_get("serial")?,
            title: row.try_get("title")?,
            author: row.try_get("author")?,
            is_borrowed: row.try_get("is_borrowed")?,
            borrowed_by: row.try_get("borrowed_by")?,
            borrowed_at: row.try_get("borrowed_at")?,
        })
    }
}

impl StoredBook {
    /// Convert database row to a lending-engine Book.
    pub fn into_book(self) -> Book {
        Book {
            serial: self.serial,
            title: self.title,
            author: self.author,
            is_borrowed: self.is_borrowed,
            borrowed_by: self.borrowed_by,
            borrowed_at: self.borrowed_at,
        }
    }
}

/// PostgreSQL-backed book store.
///
/// Loan transitions lock the book's row for the length of a transaction, so
/// concurrent updates to one serial run one after another.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

/// Overwrite every mutable column of the book's row and return the row as
/// stored. Timestamps come back at the column's microsecond precision.
async fn write_book(
    conn: &mut PgConnection,
    book: &Book,
) -> Result<Option<StoredBook>, sqlx::Error> {
    sqlx::query_as::<_, StoredBook>(
        r#"
        UPDATE books
        SET title = $2, author = $3, is_borrowed = $4, borrowed_by = $5, borrowed_at = $6
        WHERE serial = $1
        RETURNING serial, title, author, is_borrowed, borrowed_by, borrowed_at
        "#,
    )
    .bind(&book.serial)
    .bind(&book.title)
    .bind(&book.author)
    .bind(book.is_borrowed)
    .bind(&book.borrowed_by)
    .bind(book.borrowed_at)
    .fetch_optional(conn)
    .await
}

impl BookStore for PgStore {
    type Error = AppError;

    async fn create(&self, book: Book) -> Result<Book, AppError> {
        let inserted = sqlx::query_as::<_, StoredBook>(
            r#"
            INSERT INTO books (serial, title, author, is_borrowed, borrowed_by, borrowed_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (serial) DO NOTHING
            RETURNING serial, title, author, is_borrowed, borrowed_by, borrowed_at
            "#,
        )
        .bind(&book.serial)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.is_borrowed)
        .bind(&book.borrowed_by)
        .bind(book.borrowed_at)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(row) => Ok(row.into_book()),
            None => Err(Error::AlreadyExists(book.serial).into()),
        }
    }

    async fn list(&self) -> Result<Vec<Book>, AppError> {
        let rows = sqlx::query_as::<_, StoredBook>(
            r#"
            SELECT serial, title, author, is_borrowed, borrowed_by, borrowed_at
            FROM books
            ORDER BY serial ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(StoredBook::into_book).collect())
    }

    async fn get(&self, serial: &str) -> Result<Option<Book>, AppError> {
        let row = sqlx::query_as::<_, StoredBook>(
            r#"
            SELECT serial, title, author, is_borrowed, borrowed_by, borrowed_at
            FROM books
            WHERE serial = $1
            "#,
        )
        .bind(serial)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(StoredBook::into_book))
    }

    async fn replace(&self, book: Book) -> Result<bool, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(write_book(&mut *conn, &book).await?.is_some())
    }

    async fn delete(&self, serial: &str) -> Result<bool, AppError> {
        let result = sqlx::query(r#"DELETE FROM books WHERE serial = $1"#)
            .bind(serial)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update<F>(&self, serial: &str, f: F) -> Result<Option<Book>, AppError>
    where
        F: FnOnce(&Book) -> lending_engine::error::Result<Book> + Send,
    {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, StoredBook>(
            r#"
            SELECT serial, title, author, is_borrowed, borrowed_by, borrowed_at
            FROM books
            WHERE serial = $1
            FOR UPDATE
            "#,
        )
        .bind(serial)
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping `tx` on any early return rolls back and releases the lock
        let Some(current) = current else {
            return Ok(None);
        };

        let next = f(&current.into_book())?;
        let stored = write_book(&mut *tx, &next).await?;
        tx.commit().await?;

        Ok(stored.map(StoredBook::into_book))
    }
}
