//! Error types for RatePal
//!
//! All errors use thiserror for structured error handling.
//! They serialize to their display message so callers can surface them
//! as a blocking alert.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Custom field not found: {0}")]
    FieldNotFound(String),

    #[error("Field value not found: {0}")]
    FieldValueNotFound(String),

    #[error("Rating system not found: {0}")]
    RatingSystemNotFound(i64),

    #[error("Unknown field type: {0}")]
    UnknownFieldType(String),

    #[error("Invalid field definition: {0}")]
    InvalidField(String),

    #[error("Invalid field value: {0}")]
    InvalidValue(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Generic(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
