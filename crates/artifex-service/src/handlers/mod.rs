//! API handlers.

pub mod health;
pub mod images;
pub mod payments;
pub mod users;
