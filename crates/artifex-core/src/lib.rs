//! Core types for artifex.
//!
//! This crate provides the foundational types shared by the store and service:
//!
//! - **Identifiers**: `UserId`, `TransactionId`
//! - **Users**: `User` (identity, email, password hash, credit balance)
//! - **Transactions**: `Transaction` (a payment attempt with a one-shot settled flag)
//! - **Plans**: `Plan` (fixed credit/price pairs selectable at checkout)
//!
//! # Credits
//!
//! A credit is the integer unit consumed per generated image. Balances are
//! stored as `i64` and only ever mutated by the store's atomic compound
//! operations, so a balance never goes negative.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ids;
pub mod transaction;
pub mod user;

pub use ids::{IdError, TransactionId, UserId};
pub use transaction::{Plan, PlanError, Transaction};
pub use user::User;
