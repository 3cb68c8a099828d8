use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::warn;

use crate::error::Error;
use crate::models::{ActionButton, DeliveryReport};

/// Outbound side of the chat transport.
#[async_trait]
pub trait Distributor: Send + Sync {
    async fn send_photo(
        &self,
        recipient: i64,
        photo: &Path,
        caption: &str,
        action: Option<&ActionButton>,
    ) -> Result<(), Error>;

    async fn send_text(
        &self,
        recipient: i64,
        text: &str,
        action: Option<&ActionButton>,
    ) -> Result<(), Error>;

    /// Single-recipient photo without a button.
    async fn send_to_one(&self, recipient: i64, photo: &Path, caption: &str) -> Result<(), Error> {
        self.send_photo(recipient, photo, caption, None).await
    }

    /// Sends to each recipient in turn. A failed recipient is logged and skipped.
    async fn broadcast_to_all(
        &self,
        recipients: &[i64],
        photo: &Path,
        caption: &str,
        action: Option<&ActionButton>,
    ) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for &recipient in recipients {
            match self.send_photo(recipient, photo, caption, action).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!("broadcast to user {} failed: {:?}", recipient, e);
                    report.failed.push(recipient);
                }
            }
        }
        report
    }
}

/// Produces the degraded preview of a catalog image.
#[async_trait]
pub trait Obscurer: Send + Sync {
    async fn obscure(&self, image: &str) -> Result<PathBuf, Error>;
}

/// Tiles images into one picture, in the given order.
#[async_trait]
pub trait CollageComposer: Send + Sync {
    async fn compose(&self, tiles: &[PathBuf], output_name: &str) -> Result<PathBuf, Error>;
}
