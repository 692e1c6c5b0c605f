use std::fmt;

use garde::Validate;
use time::{Duration, OffsetDateTime};

use super::error::Result;
use super::repository::BookRepository;

pub type BookId = i64;

const BLANK: &str = "can't be blank";

/// A book record.
///
/// A `Book` may hold invalid data while in memory; it is only ever written
/// through [`Book::save`], which refuses to persist it unless it validates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate, sqlx::FromRow)]
pub struct Book {
    #[garde(skip)]
    id: Option<BookId>,
    #[garde(custom(presence))]
    pub name: Option<String>,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(skip)]
    created_at: Option<OffsetDateTime>,
    #[garde(skip)]
    updated_at: Option<OffsetDateTime>,
}

fn presence(value: &Option<String>, _ctx: &()) -> garde::Result {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(garde::Error::new(BLANK)),
    }
}

impl Book {
    /// New, unsaved book with every attribute absent.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> Option<BookId> {
        self.id
    }

    pub fn created_at(&self) -> Option<OffsetDateTime> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<OffsetDateTime> {
        self.updated_at
    }

    /// True until the book has been written to storage.
    pub fn is_new_record(&self) -> bool {
        self.id.is_none()
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Check that `name` is present. `description` is never checked.
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        self.validated().map(|_| ())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Borrow the book as a [`ValidBook`], the only form repositories accept.
    pub fn validated(&self) -> std::result::Result<ValidBook<'_>, ValidationErrors> {
        Validate::validate(self)?;
        Ok(ValidBook(self))
    }

    /// Validate, stamp timestamps and write the book through `repo`.
    ///
    /// On any failure `self` is left exactly as it was.
    pub async fn save(&mut self, repo: &dyn BookRepository) -> Result<()> {
        Book::validate(self)?;

        let now = current_timestamp();
        let mut staged = self.clone();
        staged.updated_at = Some(now);

        match staged.id {
            None => {
                staged.created_at = Some(now);
                let id = repo.insert(&ValidBook(&staged)).await?;
                staged.id = Some(id);
                tracing::info!(book_id = id, "book created");
            }
            Some(id) => {
                repo.update(&ValidBook(&staged)).await?;
                tracing::info!(book_id = id, "book updated");
            }
        }

        *self = staged;
        Ok(())
    }

    /// Delete the stored record. A book that was never saved has nothing to delete.
    pub async fn destroy(self, repo: &dyn BookRepository) -> Result<()> {
        match self.id {
            Some(id) => {
                repo.delete(id).await?;
                tracing::info!(book_id = id, "book destroyed");
            }
            None => tracing::debug!("destroy called on unsaved book"),
        }
        Ok(())
    }
}

/// UTC now, truncated to the microsecond precision the `books` table keeps.
fn current_timestamp() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now - Duration::nanoseconds(i64::from(now.nanosecond() % 1_000))
}

/// Proof that the wrapped book passed validation.
#[derive(Debug, Clone, Copy)]
pub struct ValidBook<'a>(&'a Book);

impl<'a> ValidBook<'a> {
    pub fn book(&self) -> &'a Book {
        self.0
    }
}

impl std::ops::Deref for ValidBook<'_> {
    type Target = Book;

    fn deref(&self) -> &Self::Target {
        self.0
    }
}

/// A required attribute was missing or blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} {message}")]
pub struct PresenceError {
    field: String,
    message: String,
}

impl PresenceError {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: BLANK.to_string(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Human readable form, e.g. `Name can't be blank`.
    pub fn full_message(&self) -> String {
        format!("{} {}", humanize(&self.field), self.message)
    }
}

fn humanize(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Errors collected by a failed validation, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<PresenceError>,
}

impl ValidationErrors {
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PresenceError> {
        self.errors.iter()
    }

    /// Errors recorded against `field`.
    pub fn on(&self, field: &str) -> Vec<&PresenceError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    pub fn full_messages(&self) -> Vec<String> {
        self.errors.iter().map(PresenceError::full_message).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: {}", self.full_messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<garde::Report> for ValidationErrors {
    fn from(report: garde::Report) -> Self {
        let errors = report
            .iter()
            .map(|(path, error)| PresenceError {
                field: path.to_string(),
                message: error.message().to_string(),
            })
            .collect();
        Self { errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::factory::BookFactory;

    #[test]
    fn book_with_name_is_valid() {
        let book = Book::new().with_name("Dune");
        assert!(book.validate().is_ok());
        assert!(book.is_valid());
    }

    #[test]
    fn book_without_name_or_description_is_invalid() {
        let book = Book::new();

        let errors = book.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.on("name"), vec![&PresenceError::new("name")]);
        assert!(errors.on("description").is_empty());
    }

    #[test]
    fn empty_and_whitespace_names_are_blank() {
        for name in ["", "   ", "\t\n", "\u{3000}"] {
            let book = Book::new().with_name(name);
            let errors = book.validate().unwrap_err();
            assert_eq!(errors.on("name").len(), 1, "name {name:?} should be blank");
        }
    }

    #[test]
    fn description_never_affects_validity() {
        assert!(Book::new().with_name("Dune").with_description("").is_valid());
        assert!(Book::new()
            .with_name("Dune")
            .with_description("Desert planet")
            .is_valid());
        assert!(!Book::new().with_description("Desert planet").is_valid());
    }

    #[test]
    fn factory_default_is_valid() {
        let book = BookFactory::default().build();
        assert_eq!(book.name.as_deref(), Some("MyString"));
        assert!(book.validate().is_ok());
    }

    #[test]
    fn new_book_is_a_new_record() {
        let book = Book::new().with_name("Dune");
        assert!(book.is_new_record());
        assert!(!book.is_persisted());
        assert_eq!(book.id(), None);
        assert_eq!(book.created_at(), None);
    }

    #[test]
    fn messages_read_naturally() {
        let errors = Book::new().validate().unwrap_err();
        assert_eq!(errors.full_messages(), vec!["Name can't be blank"]);
        assert_eq!(errors.to_string(), "Validation failed: Name can't be blank");
        assert_eq!(PresenceError::new("name").to_string(), "name can't be blank");
    }

    #[test]
    fn timestamps_keep_microsecond_precision() {
        assert_eq!(current_timestamp().nanosecond() % 1_000, 0);
    }
}
