//! src/context.rs
//!
//! Shared handles the server hands to its background tasks.

use std::sync::Arc;

use auctionbot_common::traits::delivery_traits::Distributor;
use auctionbot_core::imaging::{GridCollage, ImageLibrary, PixelateObscurer};
use auctionbot_core::repositories::{
    SqliteCatalogRepository, SqliteClaimRepository, SqlitePointsLedger, SqliteReOfferRepository,
    SqliteSettingsRepository, SqliteUserRepository,
};
use auctionbot_core::services::{
    AdminService, AuctionService, CatalogService, CollectionService, InteractionService,
    ReOfferService, UserService,
};
use auctionbot_core::tasks::BroadcastCycle;
use auctionbot_core::Database;

use crate::Args;

pub struct ServerContext {
    pub db: Database,
    pub library: ImageLibrary,
    pub user_service: Arc<UserService>,
    pub catalog_service: Arc<CatalogService>,
    pub broadcast: Arc<BroadcastCycle>,
    pub interaction: Arc<InteractionService>,
}

impl ServerContext {
    /// Builds repositories and services over an already migrated database.
    pub fn new(args: &Args, db: Database, distributor: Arc<dyn Distributor + Send + Sync>) -> Self {
        let pool = db.pool().clone();
        let library = ImageLibrary::new(&args.image_dir, &args.hidden_dir, &args.collage_dir);

        let settings = Arc::new(SqliteSettingsRepository::new(pool.clone()));
        let users_repo = Arc::new(SqliteUserRepository::new(pool.clone()));
        let points = Arc::new(SqlitePointsLedger::new(pool.clone()));
        let catalog = Arc::new(SqliteCatalogRepository::new(pool.clone()));
        let claims = Arc::new(SqliteClaimRepository::new(pool.clone()));
        let re_offer_repo = Arc::new(SqliteReOfferRepository::new(pool));

        let obscurer = Arc::new(PixelateObscurer::new(library.clone()));
        let composer = Arc::new(GridCollage::new(library.collage_dir()));

        let user_service = Arc::new(UserService::new(users_repo.clone(), points.clone()));
        let catalog_service = Arc::new(CatalogService::new(catalog.clone(), library.clone()));
        let auction = Arc::new(AuctionService::new(settings.clone(), catalog.clone(), claims.clone()));
        let re_offers = Arc::new(ReOfferService::new(settings.clone(), users_repo.clone(), re_offer_repo));
        let admin = Arc::new(AdminService::new(users_repo.clone(), settings.clone(), catalog.clone()));
        let collection = Arc::new(CollectionService::new(
            catalog.clone(),
            claims.clone(),
            points,
            obscurer.clone(),
            composer,
            library.clone(),
        ));
        let broadcast = Arc::new(BroadcastCycle::new(
            settings,
            catalog,
            claims,
            users_repo,
            obscurer.clone(),
            distributor.clone(),
        ));
        let interaction = Arc::new(InteractionService::new(
            user_service.clone(),
            auction,
            re_offers,
            admin,
            collection,
            broadcast.clone(),
            obscurer,
            distributor,
            library.clone(),
        ));

        Self {
            db,
            library,
            user_service,
            catalog_service,
            broadcast,
            interaction,
        }
    }
}
