//! Purchase transactions and the plan table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{TransactionId, UserId};

/// A credit purchase plan.
///
/// Each plan is a fixed (credits, price) pair. Prices are in major currency
/// units; the gateway order is created for `amount() * 100` subunits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plan {
    /// 100 credits for 10.
    Basic,
    /// 500 credits for 50.
    Advanced,
    /// 5000 credits for 250.
    Business,
}

impl Plan {
    /// Credits granted when a purchase of this plan settles.
    #[must_use]
    pub fn credits(self) -> i64 {
        match self {
            Self::Basic => 100,
            Self::Advanced => 500,
            Self::Business => 5000,
        }
    }

    /// Price in major currency units.
    #[must_use]
    pub fn amount(self) -> i64 {
        match self {
            Self::Basic => 10,
            Self::Advanced => 50,
            Self::Business => 250,
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Basic => "Basic",
            Self::Advanced => "Advanced",
            Self::Business => "Business",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Plan {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Basic" => Ok(Self::Basic),
            "Advanced" => Ok(Self::Advanced),
            "Business" => Ok(Self::Business),
            other => Err(PlanError::Unknown(other.to_string())),
        }
    }
}

/// Error for unrecognized plan identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// The plan id is not in the fixed plan table.
    #[error("unknown plan: {0}")]
    Unknown(String),
}

/// A payment attempt.
///
/// Created unsettled when a gateway order is initiated. Settles at most once,
/// when the order is verified paid; settlement is the gate for crediting the
/// owning user, so a transaction can never credit twice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID (ULID, time-ordered). Carried as the gateway
    /// order's receipt.
    pub id: TransactionId,

    /// The purchasing user.
    pub user_id: UserId,

    /// The plan purchased.
    pub plan: Plan,

    /// Credits granted on settlement.
    pub credits: i64,

    /// Price in major currency units.
    pub amount: i64,

    /// Whether the payment has been verified and the credits granted.
    pub settled: bool,

    /// When the purchase was initiated.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new unsettled transaction for a plan purchase.
    #[must_use]
    pub fn pending(user_id: UserId, plan: Plan) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            plan,
            credits: plan.credits(),
            amount: plan.amount(),
            settled: false,
            created_at: Utc::now(),
        }
    }
}
