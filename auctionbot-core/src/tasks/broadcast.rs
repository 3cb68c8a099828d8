// src/tasks/broadcast.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use auctionbot_common::models::{
    ActionButton, ActionToken, AuctionSettings, DrawOutcome, Item, LiveItem,
};
use auctionbot_common::traits::delivery_traits::{Distributor, Obscurer};
use auctionbot_common::traits::repository_traits::{
    CatalogRepository, ClaimRepository, SettingsRepository, UserRepository,
};
use crate::Error;

/// Draws the next item on each tick and pushes it to every user.
/// Remembers the item on air so late joiners can still be shown it.
pub struct BroadcastCycle {
    settings: Arc<dyn SettingsRepository + Send + Sync>,
    catalog: Arc<dyn CatalogRepository + Send + Sync>,
    claims: Arc<dyn ClaimRepository + Send + Sync>,
    users: Arc<dyn UserRepository + Send + Sync>,
    obscurer: Arc<dyn Obscurer + Send + Sync>,
    distributor: Arc<dyn Distributor + Send + Sync>,
    live: RwLock<Option<LiveItem>>,
}

pub fn claim_button(item_id: i64) -> ActionButton {
    ActionButton::new("Claim", ActionToken::Claim(item_id))
}

pub fn broadcast_caption(settings: &AuctionSettings) -> String {
    format!(
        "New prize up for grabs! The first {} to press Claim win it and get {} points.",
        settings.winners_per_item, settings.reward_per_win
    )
}

impl BroadcastCycle {
    pub fn new(
        settings: Arc<dyn SettingsRepository + Send + Sync>,
        catalog: Arc<dyn CatalogRepository + Send + Sync>,
        claims: Arc<dyn ClaimRepository + Send + Sync>,
        users: Arc<dyn UserRepository + Send + Sync>,
        obscurer: Arc<dyn Obscurer + Send + Sync>,
        distributor: Arc<dyn Distributor + Send + Sync>,
    ) -> Self {
        debug!("Initializing BroadcastCycle");
        Self {
            settings,
            catalog,
            claims,
            users,
            obscurer,
            distributor,
            live: RwLock::new(None),
        }
    }

    pub async fn live_item(&self) -> Option<LiveItem> {
        self.live.read().await.clone()
    }

    /// One tick: draw (recycling the catalog once if needed), mark, obscure, broadcast.
    pub async fn run_once(&self) -> Result<DrawOutcome, Error> {
        // 1) Draw
        let item = match self.draw().await? {
            Some(item) => item,
            None => {
                warn!("Catalog is empty; skipping this broadcast");
                return Ok(DrawOutcome::CatalogExhausted);
            }
        };

        // 2) Take it out of the primary rotation
        self.catalog.mark_consumed(item.item_id).await?;

        // 3) Obscured preview, remembered for late joiners
        let obscured = self.obscurer.obscure(&item.image).await?;
        let live = LiveItem {
            item: Item { consumed: true, ..item },
            obscured,
        };
        *self.live.write().await = Some(live.clone());

        // 4) Fan out
        let settings = self.settings.snapshot().await?;
        let recipients = self.users.list_ids().await?;
        let report = self
            .distributor
            .broadcast_to_all(
                &recipients,
                &live.obscured,
                &broadcast_caption(&settings),
                Some(&claim_button(live.item.item_id)),
            )
            .await;

        info!(
            "Broadcast item {} to {} user(s), {} failed",
            live.item.item_id,
            report.delivered,
            report.failed.len()
        );

        Ok(DrawOutcome::Drawn {
            live,
            delivered: report.delivered,
            failed: report.failed.len(),
        })
    }

    async fn draw(&self) -> Result<Option<Item>, Error> {
        if let Some(item) = self.catalog.random_unconsumed().await? {
            return Ok(Some(item));
        }
        let recycled = self.catalog.reset_all_consumed().await?;
        info!("All items consumed; recycled {} item(s)", recycled);
        self.catalog.random_unconsumed().await
    }

    /// Sends the item on air to `user_id` if it still exists and has open winner slots.
    /// Returns whether anything was sent.
    pub async fn offer_live_item_to(&self, user_id: i64) -> Result<bool, Error> {
        let Some(live) = self.live_item().await else {
            return Ok(false);
        };

        if self.catalog.get_item(live.item.item_id).await?.is_none() {
            debug!("Live item {} was deleted; clearing it", live.item.item_id);
            let mut slot = self.live.write().await;
            if slot.as_ref().map(|l| l.item.item_id) == Some(live.item.item_id) {
                *slot = None;
            }
            return Ok(false);
        }

        let settings = self.settings.snapshot().await?;
        let count = self.claims.claim_count(live.item.item_id).await?;
        if count >= settings.winners_per_item {
            debug!("Live item {} is fully claimed; not offering to {}", live.item.item_id, user_id);
            return Ok(false);
        }

        self.distributor
            .send_photo(
                user_id,
                &live.obscured,
                &broadcast_caption(&settings),
                Some(&claim_button(live.item.item_id)),
            )
            .await?;
        Ok(true)
    }

    /// Interval until the next tick, read fresh from settings.
    pub async fn next_interval(&self) -> Duration {
        match self.settings.snapshot().await {
            Ok(s) => s.broadcast_interval(),
            Err(e) => {
                warn!("Could not read broadcast interval, using default: {:?}", e);
                AuctionSettings::default().broadcast_interval()
            }
        }
    }
}

/// Spawns the broadcast loop. The first tick fires after `initial_delay`; later ticks follow
/// the interval setting. Exits when `shutdown_rx` flips to true or its sender is dropped.
pub fn spawn_broadcast_task(
    cycle: Arc<BroadcastCycle>,
    initial_delay: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut delay = initial_delay;
        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            tokio::select! {
                _ = sleep(delay) => {}
                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }

            match cycle.run_once().await {
                Ok(DrawOutcome::Drawn { live, .. }) => {
                    debug!("Item {} is now live", live.item.item_id);
                }
                Ok(DrawOutcome::CatalogExhausted) => {}
                Err(e) => error!("Broadcast cycle failed: {:?}", e),
            }

            delay = cycle.next_interval().await;
        }
        info!("Broadcast task stopped.");
    })
}
