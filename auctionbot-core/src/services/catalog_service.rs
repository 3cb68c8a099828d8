use std::sync::Arc;

use tracing::{debug, info};

use auctionbot_common::traits::repository_traits::CatalogRepository;
use crate::imaging::ImageLibrary;
use crate::Error;

/// Keeps the catalog in step with the image directory.
pub struct CatalogService {
    catalog: Arc<dyn CatalogRepository + Send + Sync>,
    library: ImageLibrary,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogRepository + Send + Sync>, library: ImageLibrary) -> Self {
        debug!("Initializing CatalogService");
        Self { catalog, library }
    }

    /// Adds every image file not yet in the catalog. Returns how many were added.
    pub async fn ingest_directory(&self) -> Result<usize, Error> {
        let mut added = 0;
        for name in self.library.scan().await? {
            if self.catalog.has_image(&name).await? {
                continue;
            }
            self.catalog.add_item(&name, None).await?;
            added += 1;
        }
        info!(
            "Catalog ingestion from {:?}: {} new item(s)",
            self.library.source_dir(),
            added
        );
        Ok(added)
    }
}
