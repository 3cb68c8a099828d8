// src/services/collection_service.rs

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use auctionbot_common::traits::delivery_traits::{CollageComposer, Obscurer};
use auctionbot_common::traits::repository_traits::{CatalogRepository, ClaimRepository, PointsLedger};
use crate::imaging::ImageLibrary;
use crate::Error;

/// A user's personal score card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionView {
    /// `None` when the catalog has no images at all.
    pub collage: Option<PathBuf>,
    pub won: usize,
    pub total: usize,
    pub points: i64,
}

impl CollectionView {
    pub fn caption(&self) -> String {
        format!(
            "You have collected {} of {} prizes. Balance: {} points.",
            self.won, self.total, self.points
        )
    }
}

pub struct CollectionService {
    catalog: Arc<dyn CatalogRepository + Send + Sync>,
    claims: Arc<dyn ClaimRepository + Send + Sync>,
    points: Arc<dyn PointsLedger + Send + Sync>,
    obscurer: Arc<dyn Obscurer + Send + Sync>,
    composer: Arc<dyn CollageComposer + Send + Sync>,
    library: ImageLibrary,
}

impl CollectionService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository + Send + Sync>,
        claims: Arc<dyn ClaimRepository + Send + Sync>,
        points: Arc<dyn PointsLedger + Send + Sync>,
        obscurer: Arc<dyn Obscurer + Send + Sync>,
        composer: Arc<dyn CollageComposer + Send + Sync>,
        library: ImageLibrary,
    ) -> Self {
        Self { catalog, claims, points, obscurer, composer, library }
    }

    /// One tile per distinct catalog image, sorted by name: the original if the user won it,
    /// the obscured preview otherwise.
    pub async fn view(&self, user_id: i64) -> Result<CollectionView, Error> {
        let images: BTreeSet<String> = self
            .catalog
            .list_all()
            .await?
            .into_iter()
            .map(|item| item.image)
            .collect();
        let owned: HashSet<String> = self.claims.claimed_images_for(user_id).await?.into_iter().collect();
        let points = self.points.balance(user_id).await?;

        if images.is_empty() {
            return Ok(CollectionView { collage: None, won: 0, total: 0, points });
        }

        let mut tiles = Vec::with_capacity(images.len());
        let mut won = 0;
        for image in &images {
            if owned.contains(image) {
                won += 1;
                tiles.push(self.library.original_path(image));
            } else {
                tiles.push(self.obscurer.obscure(image).await?);
            }
        }

        let name = format!("collage_{}_{}.jpg", user_id, Uuid::new_v4().simple());
        let collage = self.composer.compose(&tiles, &name).await?;
        debug!("Collage for user {}: {} of {} at {:?}", user_id, won, images.len(), collage);

        Ok(CollectionView {
            collage: Some(collage),
            won,
            total: images.len(),
            points,
        })
    }
}
