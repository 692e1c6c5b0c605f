use super::models::{BookId, ValidationErrors};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Record not found: book {0}")]
    RecordNotFound(BookId),

    #[error("Book has not been saved yet")]
    NotPersisted,
}

impl Error {
    /// The field errors when this is a validation failure, otherwise `None`.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Error::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}
