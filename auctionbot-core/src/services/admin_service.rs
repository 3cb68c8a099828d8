// src/services/admin_service.rs

use std::sync::Arc;

use tracing::{debug, info, warn};

use auctionbot_common::models::{AdminCommand, AuctionSettings, Item, SettingKey};
use auctionbot_common::traits::repository_traits::{
    CatalogRepository, SettingsRepository, UserRepository,
};
use crate::Error;

const ADMIN_HELP: &str = "\
Admin commands:
/admin_settings - current settings
/admin_interval N - minutes between broadcasts
/admin_winners N - winners per prize
/admin_bonus N - points per win
/admin_re_cost N - re-offer entry cost
/admin_re_duration N - re-offer length in minutes
/admin_add_prize - send a photo to add it
/admin_prizes - list prizes
/admin_delete_prize ID - delete a prize
/admin_set_admin USER_ID - grant admin rights";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminResponse {
    Help,
    Settings(AuctionSettings),
    SettingUpdated { key: SettingKey, value: i64 },
    ItemAdded(Item),
    Items(Vec<Item>),
    ItemDeleted(i64),
    AdminGranted(i64),
}

impl AdminResponse {
    pub fn render(&self) -> String {
        match self {
            AdminResponse::Help => ADMIN_HELP.to_string(),
            AdminResponse::Settings(s) => format!(
                "Settings:\n\
                 Broadcast interval: {} min\n\
                 Winners per prize: {}\n\
                 Points per win: {}\n\
                 Re-offer cost: {}\n\
                 Re-offer duration: {} min",
                s.broadcast_interval_minutes,
                s.winners_per_item,
                s.reward_per_win,
                s.re_offer_cost,
                s.re_offer_duration_minutes
            ),
            AdminResponse::SettingUpdated { key, value } => format!("{} set to {}", key, value),
            AdminResponse::ItemAdded(item) => format!("Prize #{} added ({})", item.item_id, item.image),
            AdminResponse::Items(items) if items.is_empty() => "No prizes yet.".to_string(),
            AdminResponse::Items(items) => {
                let mut out = String::from("Prizes:");
                for item in items {
                    out.push_str(&format!(
                        "\n#{} {} - added {} - {}",
                        item.item_id,
                        item.image,
                        item.added_at.format("%Y-%m-%d %H:%M"),
                        if item.consumed { "drawn" } else { "waiting" }
                    ));
                }
                out
            }
            AdminResponse::ItemDeleted(id) => format!("Prize #{} deleted", id),
            AdminResponse::AdminGranted(id) => format!("User {} is now an admin", id),
        }
    }
}

pub struct AdminService {
    users: Arc<dyn UserRepository + Send + Sync>,
    settings: Arc<dyn SettingsRepository + Send + Sync>,
    catalog: Arc<dyn CatalogRepository + Send + Sync>,
}

impl AdminService {
    pub fn new(
        users: Arc<dyn UserRepository + Send + Sync>,
        settings: Arc<dyn SettingsRepository + Send + Sync>,
        catalog: Arc<dyn CatalogRepository + Send + Sync>,
    ) -> Self {
        debug!("Initializing AdminService");
        Self { users, settings, catalog }
    }

    pub async fn execute(&self, actor_id: i64, command: AdminCommand) -> Result<AdminResponse, Error> {
        // 1) Only admins get past this point
        if !self.users.is_admin(actor_id).await? {
            warn!("User {} attempted admin command {:?}", actor_id, command);
            return Err(Error::Unauthorized(format!(
                "user {} is not an admin",
                actor_id
            )));
        }

        // 2) Commands built by hand skip the parser, so re-check ranges
        command.validate()?;

        // 3) Dispatch
        match command {
            AdminCommand::SetInterval(_)
            | AdminCommand::SetWinnersPerItem(_)
            | AdminCommand::SetReward(_)
            | AdminCommand::SetReOfferCost(_)
            | AdminCommand::SetReOfferDuration(_) => {
                let (key, value) = command
                    .setting_update()
                    .ok_or_else(|| Error::InvalidCommand(format!("{:?} is not a setting", command)))?;
                self.settings.set(key, &value.to_string()).await?;
                info!("Admin {} set {} = {}", actor_id, key, value);
                Ok(AdminResponse::SettingUpdated { key, value })
            }
            AdminCommand::Help => Ok(AdminResponse::Help),
            AdminCommand::ShowSettings => Ok(AdminResponse::Settings(self.settings.snapshot().await?)),
            AdminCommand::AddItem { image } => {
                let item = self.catalog.add_item(&image, Some(actor_id)).await?;
                info!("Admin {} added prize {} ({})", actor_id, item.item_id, item.image);
                Ok(AdminResponse::ItemAdded(item))
            }
            AdminCommand::ListItems => Ok(AdminResponse::Items(self.catalog.list_all().await?)),
            AdminCommand::DeleteItem(item_id) => {
                if !self.catalog.delete_item(item_id).await? {
                    return Err(Error::NotFound(format!("No item with id={}", item_id)));
                }
                info!("Admin {} deleted prize {}", actor_id, item_id);
                Ok(AdminResponse::ItemDeleted(item_id))
            }
            AdminCommand::GrantAdmin(user_id) => {
                self.users.set_admin(user_id).await?;
                info!("Admin {} granted admin rights to {}", actor_id, user_id);
                Ok(AdminResponse::AdminGranted(user_id))
            }
        }
    }
}
