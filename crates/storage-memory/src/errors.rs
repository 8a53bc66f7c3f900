//! Storage-specific error types for the in-memory backend.
//!
//! These errors are internal to the storage layer and are converted to
//! `fintrack_core::Error` before being returned to callers.

use std::sync::PoisonError;

use fintrack_core::errors::{DatabaseError, Error};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Duplicate key: {0}")]
    Duplicate(String),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::LockPoisoned(e) => Error::Database(DatabaseError::Internal(e)),
            StorageError::NotFound(e) => Error::Database(DatabaseError::NotFound(e)),
            StorageError::Duplicate(e) => Error::Database(DatabaseError::UniqueViolation(e)),
        }
    }
}

/// Extension trait for converting lock results to core Results.
pub trait IntoCore<T> {
    fn into_core(self) -> fintrack_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, PoisonError<T>> {
    fn into_core(self) -> fintrack_core::Result<T> {
        self.map_err(|e| StorageError::LockPoisoned(e.to_string()).into())
    }
}
