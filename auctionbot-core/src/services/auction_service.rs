// src/services/auction_service.rs

use std::sync::Arc;

use tracing::{debug, info};

use auctionbot_common::models::ClaimOutcome;
use auctionbot_common::traits::repository_traits::{
    CatalogRepository, ClaimRepository, SettingsRepository,
};
use crate::Error;

/// Primary-round claims.
pub struct AuctionService {
    settings: Arc<dyn SettingsRepository + Send + Sync>,
    catalog: Arc<dyn CatalogRepository + Send + Sync>,
    claims: Arc<dyn ClaimRepository + Send + Sync>,
}

impl AuctionService {
    pub fn new(
        settings: Arc<dyn SettingsRepository + Send + Sync>,
        catalog: Arc<dyn CatalogRepository + Send + Sync>,
        claims: Arc<dyn ClaimRepository + Send + Sync>,
    ) -> Self {
        debug!("Initializing AuctionService");
        Self { settings, catalog, claims }
    }

    /// A claim is accepted while the item has fewer winners than the cap. The check and the
    /// insert are one statement, so concurrent claims can never push an item past its cap.
    pub async fn claim(&self, user_id: i64, item_id: i64) -> Result<ClaimOutcome, Error> {
        if self.catalog.get_item(item_id).await?.is_none() {
            return Err(Error::NotFound(format!("No item with id={}", item_id)));
        }

        let settings = self.settings.snapshot().await?;
        let outcome = self
            .claims
            .attempt_claim_capped(user_id, item_id, settings.reward_per_win, settings.winners_per_item)
            .await?;

        match outcome {
            ClaimOutcome::Won { reward } => info!("User {} won item {} (+{})", user_id, item_id, reward),
            other => debug!("User {} claim on item {}: {:?}", user_id, item_id, other),
        }
        Ok(outcome)
    }

    pub async fn claim_count(&self, item_id: i64) -> Result<i64, Error> {
        self.claims.claim_count(item_id).await
    }

    pub async fn image_for(&self, item_id: i64) -> Result<String, Error> {
        self.catalog
            .image_for(item_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No item with id={}", item_id)))
    }
}
