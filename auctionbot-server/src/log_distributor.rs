//! Stand-in for the chat transport: every outbound message is written to the log.

use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use auctionbot_common::models::ActionButton;
use auctionbot_common::traits::delivery_traits::Distributor;
use auctionbot_core::Error;

pub struct LogDistributor;

#[async_trait]
impl Distributor for LogDistributor {
    async fn send_photo(
        &self,
        recipient: i64,
        photo: &Path,
        caption: &str,
        action: Option<&ActionButton>,
    ) -> Result<(), Error> {
        match action {
            Some(button) => info!(
                "-> {} photo {:?}: {} [{}: {}]",
                recipient, photo, caption, button.label, button.token
            ),
            None => info!("-> {} photo {:?}: {}", recipient, photo, caption),
        }
        Ok(())
    }

    async fn send_text(&self, recipient: i64, text: &str, action: Option<&ActionButton>) -> Result<(), Error> {
        match action {
            Some(button) => info!("-> {} {} [{}: {}]", recipient, text, button.label, button.token),
            None => info!("-> {} {}", recipient, text),
        }
        Ok(())
    }
}
