//! Book fixtures for tests.

use super::error::Result;
use super::models::Book;
use super::repository::BookRepository;

pub const DEFAULT_NAME: &str = "MyString";
pub const DEFAULT_DESCRIPTION: &str = "MyText";

/// Builds valid books with default attributes, any of which can be overridden.
#[derive(Debug, Clone)]
pub struct BookFactory {
    name: Option<String>,
    description: Option<String>,
}

impl Default for BookFactory {
    fn default() -> Self {
        Self {
            name: Some(DEFAULT_NAME.to_string()),
            description: Some(DEFAULT_DESCRIPTION.to_string()),
        }
    }
}

impl BookFactory {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn without_name(mut self) -> Self {
        self.name = None;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn without_description(mut self) -> Self {
        self.description = None;
        self
    }

    /// Unsaved book
    pub fn build(&self) -> Book {
        let mut book = Book::new();
        book.name = self.name.clone();
        book.description = self.description.clone();
        book
    }

    pub fn build_list(&self, count: usize) -> Vec<Book> {
        (0..count).map(|_| self.build()).collect()
    }

    /// Build and save through `repo`.
    pub async fn create(&self, repo: &dyn BookRepository) -> Result<Book> {
        let mut book = self.build();
        book.save(repo).await?;
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixture_values() {
        let book = BookFactory::default().build();
        assert_eq!(book.name.as_deref(), Some("MyString"));
        assert_eq!(book.description.as_deref(), Some("MyText"));
        assert!(book.is_new_record());
    }

    #[test]
    fn overrides_apply() {
        let book = BookFactory::default()
            .name("Dune")
            .without_description()
            .build();
        assert_eq!(book.name.as_deref(), Some("Dune"));
        assert_eq!(book.description, None);

        let nameless = BookFactory::default().without_name().build();
        assert!(!nameless.is_valid());
    }

    #[test]
    fn build_list_builds_independent_books() {
        let books = BookFactory::default().description("Spice").build_list(3);
        assert_eq!(books.len(), 3);
        assert!(books
            .iter()
            .all(|b| b.is_valid() && b.description.as_deref() == Some("Spice")));
    }
}
