// src/services/re_offer_service.rs

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use auctionbot_common::models::{ReOffer, ReOfferEntryOutcome};
use auctionbot_common::traits::repository_traits::{
    ReOfferRepository, SettingsRepository, UserRepository,
};
use crate::Error;

pub struct ReOfferService {
    settings: Arc<dyn SettingsRepository + Send + Sync>,
    users: Arc<dyn UserRepository + Send + Sync>,
    re_offers: Arc<dyn ReOfferRepository + Send + Sync>,
}

impl ReOfferService {
    pub fn new(
        settings: Arc<dyn SettingsRepository + Send + Sync>,
        users: Arc<dyn UserRepository + Send + Sync>,
        re_offers: Arc<dyn ReOfferRepository + Send + Sync>,
    ) -> Self {
        debug!("Initializing ReOfferService");
        Self { settings, users, re_offers }
    }

    /// Opens a paid second round for `original_item_id` on behalf of an admin.
    ///
    /// Returns `None` when the original already has all its winners. Cost and duration are
    /// taken from the settings at this moment and fixed for the life of the re-offer.
    pub async fn open(&self, actor_id: i64, original_item_id: i64) -> Result<Option<ReOffer>, Error> {
        if !self.users.is_admin(actor_id).await? {
            return Err(Error::Unauthorized(format!(
                "user {} may not open re-offers",
                actor_id
            )));
        }

        let settings = self.settings.snapshot().await?;
        let opened = self
            .re_offers
            .open(
                original_item_id,
                settings.winners_per_item,
                settings.re_offer_cost,
                settings.re_offer_duration(),
                Utc::now(),
            )
            .await?;

        if let Some(ro) = &opened {
            info!(
                "Re-offer {} opened for item {} (cost {}, until {})",
                ro.item_id, ro.original_item_id, ro.cost, ro.end_at
            );
        }
        Ok(opened)
    }

    pub async fn enter(&self, user_id: i64, item_id: i64) -> Result<ReOfferEntryOutcome, Error> {
        let settings = self.settings.snapshot().await?;
        let outcome = self
            .re_offers
            .enter(user_id, item_id, settings.reward_per_win, Utc::now())
            .await?;
        debug!("User {} re-offer entry on item {}: {:?}", user_id, item_id, outcome);
        Ok(outcome)
    }

    pub async fn list_active(&self) -> Result<Vec<ReOffer>, Error> {
        self.re_offers.list_active(Utc::now()).await
    }
}
