//! User account records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// A registered user.
///
/// The credit balance is only ever mutated through the store's atomic compound
/// operations (debit on generation, credit on settlement), so reading it here
/// is always a point-in-time snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// The user ID.
    pub id: UserId,

    /// Display name.
    pub name: String,

    /// Email address, unique across users, stored lowercased.
    pub email: String,

    /// Argon2id password hash (PHC string format).
    pub password_hash: String,

    /// Current credit balance. One credit buys one generated image.
    pub credit_balance: i64,

    /// When the user registered.
    pub created_at: DateTime<Utc>,

    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a zero credit balance.
    #[must_use]
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::generate(),
            name,
            email,
            password_hash,
            credit_balance: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the user can afford a single image generation.
    #[must_use]
    pub fn can_generate(&self) -> bool {
        self.credit_balance > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_starts_with_zero_balance() {
        let user = User::new("A".into(), "a@x.com".into(), "$argon2id$...".into());
        assert_eq!(user.credit_balance, 0);
        assert!(!user.can_generate());
    }

    #[test]
    fn positive_balance_allows_generation() {
        let mut user = User::new("A".into(), "a@x.com".into(), "hash".into());
        user.credit_balance = 1;
        assert!(user.can_generate());
    }
}
