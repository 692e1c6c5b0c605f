use async_trait::async_trait;
use bookshelf_db::Pool;

use super::error::{Error, Result};
use super::models::{Book, BookId, ValidBook};

/// Storage for book records, passed explicitly to whatever needs it.
///
/// Writes take a [`ValidBook`], so nothing can be stored without passing validation.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert a new row and return the id storage assigned to it.
    async fn insert(&self, book: &ValidBook<'_>) -> Result<BookId>;

    async fn update(&self, book: &ValidBook<'_>) -> Result<()>;

    async fn find(&self, id: BookId) -> Result<Book>;

    /// All books, ordered by id
    async fn all(&self) -> Result<Vec<Book>>;

    async fn count(&self) -> Result<i64>;

    async fn delete(&self, id: BookId) -> Result<()>;
}

/// [`BookRepository`] backed by the `books` table.
#[derive(Debug, Clone)]
pub struct SqlBookRepository {
    pool: Pool,
}

impl SqlBookRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for SqlBookRepository {
    async fn insert(&self, book: &ValidBook<'_>) -> Result<BookId> {
        let result = sqlx::query(
            "INSERT INTO books (name, description, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&book.name)
        .bind(&book.description)
        .bind(book.created_at())
        .bind(book.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn update(&self, book: &ValidBook<'_>) -> Result<()> {
        let id = book.id().ok_or(Error::NotPersisted)?;
        let result =
            sqlx::query("UPDATE books SET name = ?, description = ?, updated_at = ? WHERE id = ?")
                .bind(&book.name)
                .bind(&book.description)
                .bind(book.updated_at())
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            Err(Error::RecordNotFound(id))
        } else {
            Ok(())
        }
    }

    async fn find(&self, id: BookId) -> Result<Book> {
        sqlx::query_as::<_, Book>(
            "SELECT id, name, description, created_at, updated_at FROM books WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::RecordNotFound(id))
    }

    async fn all(&self) -> Result<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, name, description, created_at, updated_at FROM books ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn delete(&self, id: BookId) -> Result<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            Err(Error::RecordNotFound(id))
        } else {
            Ok(())
        }
    }
}
