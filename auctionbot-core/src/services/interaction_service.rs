// src/services/interaction_service.rs

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use auctionbot_common::models::{
    ActionButton, ActionToken, AdminCommand, ClaimOutcome, Intent, ReOfferEntryOutcome,
};
use auctionbot_common::traits::delivery_traits::{Distributor, Obscurer};
use crate::imaging::ImageLibrary;
use crate::services::{AdminService, AuctionService, CollectionService, ReOfferService, UserService};
use crate::tasks::BroadcastCycle;
use crate::Error;

/// Turns normalized transport events into core operations and answers through the distributor.
///
/// Expected refusals (not an admin, unknown prize, bad arguments) become replies to the user;
/// only infrastructure failures are returned as errors.
pub struct InteractionService {
    users: Arc<UserService>,
    auction: Arc<AuctionService>,
    re_offers: Arc<ReOfferService>,
    admin: Arc<AdminService>,
    collection: Arc<CollectionService>,
    broadcast: Arc<BroadcastCycle>,
    obscurer: Arc<dyn Obscurer + Send + Sync>,
    distributor: Arc<dyn Distributor + Send + Sync>,
    library: ImageLibrary,
}

impl InteractionService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<UserService>,
        auction: Arc<AuctionService>,
        re_offers: Arc<ReOfferService>,
        admin: Arc<AdminService>,
        collection: Arc<CollectionService>,
        broadcast: Arc<BroadcastCycle>,
        obscurer: Arc<dyn Obscurer + Send + Sync>,
        distributor: Arc<dyn Distributor + Send + Sync>,
        library: ImageLibrary,
    ) -> Self {
        debug!("Initializing InteractionService");
        Self {
            users,
            auction,
            re_offers,
            admin,
            collection,
            broadcast,
            obscurer,
            distributor,
            library,
        }
    }

    /// Accepts either a slash command or a button token.
    pub async fn handle_text(&self, user_id: i64, text: &str) -> Result<(), Error> {
        let text = text.trim();
        let parsed = if text.starts_with('/') {
            Intent::parse_command(text)
        } else {
            text.parse::<ActionToken>().map(Intent::Action)
        };

        match parsed {
            Ok(intent) => self.handle(user_id, intent).await,
            Err(Error::InvalidCommand(msg)) | Err(Error::Parse(msg)) => self.reply(user_id, &msg).await,
            Err(e) => Err(e),
        }
    }

    pub async fn handle(&self, user_id: i64, intent: Intent) -> Result<(), Error> {
        debug!("user {} -> {:?}", user_id, intent);
        let result = match intent {
            Intent::Start { name } => self.on_start(user_id, name.as_deref()).await,
            Intent::Action(ActionToken::Claim(item_id)) => self.on_claim(user_id, item_id).await,
            Intent::Action(ActionToken::ReOfferEntry(item_id)) => self.on_re_offer_entry(user_id, item_id).await,
            Intent::Action(ActionToken::RequestReOffer(item_id)) => self.on_request_re_offer(user_id, item_id).await,
            Intent::Balance => self.on_balance(user_id).await,
            Intent::Collection => self.on_collection(user_id).await,
            Intent::ReOffers => self.on_list_re_offers(user_id).await,
            Intent::Rating => self.on_rating(user_id).await,
            Intent::Admin(command) => self.on_admin(user_id, command).await,
        };

        match result {
            Err(Error::Unauthorized(msg)) => {
                debug!("refused: {}", msg);
                self.reply(user_id, "This command is for admins only.").await
            }
            Err(Error::NotFound(msg)) => self.reply(user_id, &format!("Not found: {}", msg)).await,
            Err(Error::InvalidCommand(msg)) => self.reply(user_id, &msg).await,
            other => other,
        }
    }

    async fn reply(&self, user_id: i64, text: &str) -> Result<(), Error> {
        self.distributor.send_text(user_id, text, None).await
    }

    async fn on_start(&self, user_id: i64, name: Option<&str>) -> Result<(), Error> {
        if !self.users.register(user_id, name).await? {
            return self.reply(user_id, "You are already registered.").await;
        }
        self.reply(
            user_id,
            "Welcome! A hidden prize is sent out every few minutes. Press Claim quickly to win it.",
        )
        .await?;

        // Late joiners still get a shot at the prize on air.
        self.broadcast.offer_live_item_to(user_id).await?;
        Ok(())
    }

    async fn on_claim(&self, user_id: i64, item_id: i64) -> Result<(), Error> {
        match self.auction.claim(user_id, item_id).await? {
            ClaimOutcome::Won { reward } => {
                let image = self.auction.image_for(item_id).await?;
                let caption = format!("You won prize #{}! +{} points.", item_id, reward);
                self.distributor
                    .send_to_one(user_id, &self.library.original_path(&image), &caption)
                    .await
            }
            ClaimOutcome::AlreadyClaimed => self.reply(user_id, "You have already claimed this prize.").await,
            ClaimOutcome::CapReached => {
                let button = ActionButton::new("Re-offer for points", ActionToken::RequestReOffer(item_id));
                self.distributor
                    .send_text(
                        user_id,
                        "Too late, this prize already has all its winners.",
                        Some(&button),
                    )
                    .await
            }
        }
    }

    async fn on_request_re_offer(&self, user_id: i64, item_id: i64) -> Result<(), Error> {
        let Some(re_offer) = self.re_offers.open(user_id, item_id).await? else {
            return self
                .reply(user_id, &format!("Prize #{} already has all its winners.", item_id))
                .await;
        };

        let image = self.auction.image_for(re_offer.item_id).await?;
        let preview = self.obscurer.obscure(&image).await?;
        let recipients = self.users.recipients().await?;
        let caption = format!(
            "Second chance! Prize #{} is back for {} points until {} UTC. Only one winner.",
            re_offer.item_id,
            re_offer.cost,
            re_offer.end_at.format("%H:%M")
        );
        let button = ActionButton::new(
            format!("Enter for {} points", re_offer.cost),
            ActionToken::ReOfferEntry(re_offer.item_id),
        );

        let report = self
            .distributor
            .broadcast_to_all(&recipients, &preview, &caption, Some(&button))
            .await;
        self.reply(
            user_id,
            &format!(
                "Re-offer #{} opened and sent to {} user(s).",
                re_offer.item_id, report.delivered
            ),
        )
        .await
    }

    async fn on_re_offer_entry(&self, user_id: i64, item_id: i64) -> Result<(), Error> {
        match self.re_offers.enter(user_id, item_id).await? {
            ReOfferEntryOutcome::Won { cost, reward } => {
                let image = self.auction.image_for(item_id).await?;
                let caption = format!(
                    "You won re-offered prize #{}! Spent {} points, earned {}.",
                    item_id, cost, reward
                );
                self.distributor
                    .send_to_one(user_id, &self.library.original_path(&image), &caption)
                    .await
            }
            ReOfferEntryOutcome::AlreadyClaimed => self.reply(user_id, "You have already won this prize.").await,
            ReOfferEntryOutcome::CapReached => self.reply(user_id, "Someone else already won this re-offer.").await,
            ReOfferEntryOutcome::InsufficientBalance { required, available } => {
                self.reply(
                    user_id,
                    &format!("You need {} points to enter; you have {}.", required, available),
                )
                .await
            }
            ReOfferEntryOutcome::Expired => self.reply(user_id, "This re-offer has ended.").await,
        }
    }

    async fn on_balance(&self, user_id: i64) -> Result<(), Error> {
        let points = self.users.balance(user_id).await?;
        self.reply(user_id, &format!("Your balance: {} points.", points)).await
    }

    async fn on_collection(&self, user_id: i64) -> Result<(), Error> {
        let view = self.collection.view(user_id).await?;
        let Some(collage) = &view.collage else {
            return self.reply(user_id, "There are no prizes yet.").await;
        };

        let sent = self.distributor.send_to_one(user_id, collage, &view.caption()).await;
        remove_rendered(collage).await;
        sent
    }

    async fn on_list_re_offers(&self, user_id: i64) -> Result<(), Error> {
        let active = self.re_offers.list_active().await?;
        if active.is_empty() {
            return self.reply(user_id, "No active re-offers.").await;
        }

        let mut text = String::from("Active re-offers:");
        for ro in &active {
            text.push_str(&format!(
                "\n#{}: {} points, ends {} UTC",
                ro.item_id,
                ro.cost,
                ro.end_at.format("%Y-%m-%d %H:%M")
            ));
        }
        self.reply(user_id, &text).await
    }

    async fn on_rating(&self, user_id: i64) -> Result<(), Error> {
        let rating = self.users.rating().await?;
        if rating.is_empty() {
            return self.reply(user_id, "Nobody has won anything yet.").await;
        }

        let mut text = String::from("Top collectors:");
        for (pos, entry) in rating.iter().enumerate() {
            text.push_str(&format!(
                "\n{}. {}: {} prizes, {} points",
                pos + 1,
                entry.display_name(),
                entry.claims,
                entry.points
            ));
        }
        self.reply(user_id, &text).await
    }

    async fn on_admin(&self, user_id: i64, command: AdminCommand) -> Result<(), Error> {
        let response = self.admin.execute(user_id, command).await?;
        self.reply(user_id, &response.render()).await
    }
}

async fn remove_rendered(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!("Could not remove rendered collage {:?}: {:?}", path, e);
    }
}
