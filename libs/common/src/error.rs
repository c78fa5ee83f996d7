//! Custom error types for the common library
//!
//! This module defines application-specific error types that can be used
//! throughout the application.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// True when the underlying query failed on a unique constraint
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DatabaseError::Query(SqlxError::Database(e)) => e.is_unique_violation(),
            _ => false,
        }
    }
}

impl From<SqlxError> for DatabaseError {
    fn from(err: SqlxError) -> Self {
        DatabaseError::Query(err)
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Errors raised by the on-disk media store
#[derive(Error, Debug)]
pub enum StorageError {
    /// Filesystem operation failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A public path that does not belong to the store, or that tries to
    /// escape the storage root
    #[error("Invalid media path: {0}")]
    InvalidPath(String),
}

/// Type alias for Result with StorageError
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised while issuing or validating bearer tokens
#[derive(Error, Debug)]
pub enum TokenError {
    /// Token could not be encoded
    #[error("Failed to issue token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    /// Token is malformed, has a bad signature or is expired
    #[error("Invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    /// System clock is before the unix epoch
    #[error("System clock error")]
    Clock,
}
