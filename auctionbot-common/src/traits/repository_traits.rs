use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::error::Error;
use crate::models::{
    AuctionSettings, Claim, ClaimOutcome, Item, RatingEntry, ReOffer, ReOfferEntryOutcome,
    SettingKey, User,
};

/// Named operational parameters stored as text.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self, key: SettingKey) -> Result<Option<String>, Error>;
    async fn set(&self, key: SettingKey, value: &str) -> Result<(), Error>;
    /// Inserts each default whose name is absent. Safe to call any number of times.
    async fn seed_defaults(&self) -> Result<(), Error>;
    async fn list_all(&self) -> Result<Vec<(String, String)>, Error>;
    /// Reads and parses all settings; a non-numeric value is `Error::InvalidSetting`.
    async fn snapshot(&self) -> Result<AuctionSettings, Error>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns false if the user already existed.
    async fn register(&self, user_id: i64, user_name: Option<&str>) -> Result<bool, Error>;
    async fn get(&self, user_id: i64) -> Result<Option<User>, Error>;
    async fn list_ids(&self) -> Result<Vec<i64>, Error>;
    async fn is_admin(&self, user_id: i64) -> Result<bool, Error>;
    async fn set_admin(&self, user_id: i64) -> Result<(), Error>;
    /// Users ordered by claim count, highest first.
    async fn rating(&self, limit: i64) -> Result<Vec<RatingEntry>, Error>;
}

/// Point balances. Balances never go below zero.
#[async_trait]
pub trait PointsLedger: Send + Sync {
    async fn balance(&self, user_id: i64) -> Result<i64, Error>;
    async fn credit(&self, user_id: i64, amount: i64) -> Result<(), Error>;
    /// Subtracts only if the balance covers `amount`; returns whether it did.
    async fn debit(&self, user_id: i64, amount: i64) -> Result<bool, Error>;
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn add_item(&self, image: &str, added_by: Option<i64>) -> Result<Item, Error>;
    async fn get_item(&self, item_id: i64) -> Result<Option<Item>, Error>;
    /// Uniform pick among unconsumed primary items (re-offer items never rotate),
    /// `None` when every one is consumed.
    async fn random_unconsumed(&self) -> Result<Option<Item>, Error>;
    async fn mark_consumed(&self, item_id: i64) -> Result<(), Error>;
    /// Returns how many items were recycled.
    async fn reset_all_consumed(&self) -> Result<u64, Error>;
    /// Newest first.
    async fn list_all(&self) -> Result<Vec<Item>, Error>;
    /// Returns false if no such item existed.
    async fn delete_item(&self, item_id: i64) -> Result<bool, Error>;
    async fn image_for(&self, item_id: i64) -> Result<Option<String>, Error>;
    async fn has_image(&self, image: &str) -> Result<bool, Error>;
}

#[async_trait]
pub trait ClaimRepository: Send + Sync {
    async fn claim_count(&self, item_id: i64) -> Result<i64, Error>;
    /// Records the claim and credits `reward` in one transaction, with no cap.
    async fn attempt_claim(&self, user_id: i64, item_id: i64, reward: i64) -> Result<ClaimOutcome, Error>;
    /// Like `attempt_claim`, but the insert only happens while the item has fewer than `cap` claims.
    /// Re-offer items always answer `CapReached` here; they are won through a re-offer entry.
    async fn attempt_claim_capped(
        &self,
        user_id: i64,
        item_id: i64,
        reward: i64,
        cap: i64,
    ) -> Result<ClaimOutcome, Error>;
    async fn claimed_images_for(&self, user_id: i64) -> Result<Vec<String>, Error>;
    async fn claims_for_item(&self, item_id: i64) -> Result<Vec<Claim>, Error>;
}

#[async_trait]
pub trait ReOfferRepository: Send + Sync {
    /// Clones the original into a new item and opens a re-offer on it, unless the original
    /// already has `cap` or more claims.
    async fn open(
        &self,
        original_item_id: i64,
        cap: i64,
        cost: i64,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<Option<ReOffer>, Error>;
    async fn get(&self, item_id: i64) -> Result<Option<ReOffer>, Error>;
    /// Re-offers with `end_at > now`, soonest to close first.
    async fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<ReOffer>, Error>;
    /// Paid single-winner entry: debit, claim and reward commit together or not at all.
    async fn enter(
        &self,
        user_id: i64,
        item_id: i64,
        reward: i64,
        now: DateTime<Utc>,
    ) -> Result<ReOfferEntryOutcome, Error>;
}
