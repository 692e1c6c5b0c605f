pub mod error;
pub mod factory;
pub mod models;
pub mod repository;

use async_trait::async_trait;
use bookshelf_kernel::{InitCtx, Migration, Module};

pub use error::Error;
pub use models::{Book, BookId, PresenceError, ValidBook, ValidationErrors};
pub use repository::{BookRepository, SqlBookRepository};

/// Books module: owns the `books` table
pub struct BooksModule;

impl BooksModule {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for BooksModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_books",
            up: r#"
                CREATE TABLE books (
                    id          INTEGER PRIMARY KEY NOT NULL,
                    name        TEXT,
                    description TEXT,
                    created_at  DATETIME NOT NULL,
                    updated_at  DATETIME NOT NULL
                );
                "#,
        }]
    }

    async fn start(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = SqlBookRepository::new(ctx.db.clone()).count().await?;
        tracing::info!(module = self.name(), books, "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new())
}
