//! `RocksDB` storage layer for artifex.
//!
//! Persistent storage for users and purchase transactions, using `RocksDB`
//! column families with CBOR-encoded values.
//!
//! # Column families
//!
//! - `users`: primary user records, keyed by `user_id`
//! - `users_by_email`: unique index, email bytes -> `user_id`
//! - `transactions`: purchase transactions, keyed by `transaction_id` (ULID)
//! - `transactions_by_user`: index for listing purchases by user
//!
//! # Atomicity
//!
//! Every balance or settlement mutation goes through a compound operation
//! ([`Store::debit_credit`], [`Store::settle_and_credit`],
//! [`Store::create_user`]) that checks and writes under the store's write lock
//! in a single `WriteBatch`. Handlers never read-modify-write balances across
//! two round trips.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use artifex_core::{Transaction, TransactionId, User, UserId};

/// Outcome of a settlement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The transaction settled now; credits were granted.
    Credited {
        /// The user's balance after crediting.
        balance: i64,
    },
    /// The transaction was already settled; no credits were granted.
    AlreadySettled {
        /// The user's current balance, unchanged by this call.
        balance: i64,
    },
}

impl Settlement {
    /// The user's balance after the settlement attempt.
    #[must_use]
    pub fn balance(self) -> i64 {
        match self {
            Self::Credited { balance } | Self::AlreadySettled { balance } => balance,
        }
    }
}

/// The storage trait defining all database operations.
///
/// Abstracts the storage layer so tests can substitute implementations.
pub trait Store: Send + Sync {
    // =========================================================================
    // User Operations
    // =========================================================================

    /// Insert a new user, enforcing email uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EmailTaken` if a user with the same email exists.
    fn create_user(&self, user: &User) -> Result<()>;

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user(&self, user_id: &UserId) -> Result<Option<User>>;

    /// Look up a user through the email index.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Atomically debit one credit from a user.
    ///
    /// The balance check and decrement happen under the write lock, so
    /// concurrent debits at balance 1 resolve to exactly one success.
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the user doesn't exist.
    /// - `StoreError::InsufficientCredit` if the balance is zero.
    fn debit_credit(&self, user_id: &UserId) -> Result<i64>;

    // =========================================================================
    // Transaction Operations
    // =========================================================================

    /// Insert a purchase transaction (also maintains the user index).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_transaction(&self, transaction: &Transaction) -> Result<()>;

    /// Get a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<Transaction>>;

    /// List transactions for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_transactions_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>>;

    /// Settle a transaction and credit the owning user, atomically.
    ///
    /// The settled flag is the idempotency gate: it is checked under the write
    /// lock before crediting, and the flag flip plus the balance credit commit
    /// in one batch. Re-running settlement for an already settled transaction
    /// returns [`Settlement::AlreadySettled`] with the unchanged balance.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the transaction or its user doesn't
    /// exist.
    fn settle_and_credit(&self, transaction_id: &TransactionId) -> Result<Settlement>;
}
