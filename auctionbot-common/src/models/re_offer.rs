// File: auctionbot-common/src/models/re_offer.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A time-boxed, points-priced second round for an under-claimed item.
/// `item_id` is the freshly minted catalog entry; `original_item_id` is the item it was cloned from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReOffer {
    pub item_id: i64,
    pub original_item_id: i64,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub cost: i64,
}

impl ReOffer {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.end_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReOfferEntryOutcome {
    /// Cost debited, claim recorded, reward credited.
    Won { cost: i64, reward: i64 },
    AlreadyClaimed,
    /// Someone else already won this re-offer.
    CapReached,
    InsufficientBalance { required: i64, available: i64 },
    Expired,
}
