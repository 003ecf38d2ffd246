//! Repository Module
//!
//! Thin persistence layer over the SQLite pool. Methods that must run
//! inside a slot's critical section take a `&mut SqliteConnection` so the
//! caller controls the enclosing transaction.

pub mod booking;
pub mod hold;
pub mod offer;
pub mod restaurant;
pub mod slot;

pub use booking::BookingRepository;
pub use hold::HoldRepository;
pub use offer::OfferRepository;
pub use restaurant::RestaurantRepository;
pub use slot::SlotRepository;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for crate::common::AppError {
    fn from(err: RepoError) -> Self {
        use crate::common::AppError;
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
