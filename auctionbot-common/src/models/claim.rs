// File: auctionbot-common/src/models/claim.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's win of an item. At most one exists per (user, item).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub user_id: i64,
    pub item_id: i64,
    pub claimed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimOutcome {
    /// Claim recorded and reward credited.
    Won { reward: i64 },
    /// This user already holds a claim on the item. Nothing changed.
    AlreadyClaimed,
    /// The item has all the winners it can take.
    CapReached,
}

impl ClaimOutcome {
    pub fn is_won(&self) -> bool {
        matches!(self, ClaimOutcome::Won { .. })
    }
}
