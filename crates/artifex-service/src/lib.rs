//! Artifex HTTP API service.
//!
//! This crate provides the HTTP API for artifex, including:
//!
//! - User registration and login (JWT bearer tokens)
//! - Credit balance and purchase history
//! - Image generation (debits one credit per image)
//! - Payment initiation and verification via the gateway orders API
//!
//! # Credit ledger
//!
//! The service is a thin layer over `artifex-store`: every balance mutation is
//! one of the store's atomic compound operations, so handlers never race on a
//! user's balance.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result

pub mod auth;
pub mod clipdrop;
pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod password;
pub mod razorpay;
pub mod routes;
pub mod state;

pub use clipdrop::{ClipdropClient, ClipdropError};
pub use config::ServiceConfig;
pub use error::ApiError;
pub use razorpay::{Order, RazorpayClient, RazorpayError};
pub use routes::create_router;
pub use state::AppState;
