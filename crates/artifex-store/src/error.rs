//! Error types for artifex storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("not found")]
    NotFound,

    /// A user with this email already exists.
    #[error("email already registered: {email}")]
    EmailTaken {
        /// The email that collided with the unique index.
        email: String,
    },

    /// Balance is too low to debit a credit.
    #[error("insufficient credit: balance={balance}")]
    InsufficientCredit {
        /// The current balance.
        balance: i64,
    },
}
