// File: auctionbot-core/src/test_utils/helpers.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use auctionbot_common::models::ActionButton;
use auctionbot_common::traits::delivery_traits::{CollageComposer, Distributor, Obscurer};
use auctionbot_common::traits::repository_traits::{SettingsRepository, UserRepository};
use auctionbot_common::models::SettingKey;
use crate::db::Database;
use crate::imaging::ImageLibrary;
use crate::repositories::{
    SqliteCatalogRepository, SqliteClaimRepository, SqlitePointsLedger, SqliteReOfferRepository,
    SqliteSettingsRepository, SqliteUserRepository,
};
use crate::services::{
    AdminService, AuctionService, CollectionService, InteractionService, ReOfferService, UserService,
};
use crate::tasks::BroadcastCycle;
use crate::Error;

/// Fresh in-memory database with migrations applied and default settings seeded.
pub async fn setup_test_database() -> Result<Database, Error> {
    let db = Database::new(":memory:").await?;
    db.migrate().await?;
    Ok(db)
}

/// Something the recording distributor was asked to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Photo {
        recipient: i64,
        photo: PathBuf,
        caption: String,
        action: Option<ActionButton>,
    },
    Text {
        recipient: i64,
        text: String,
        action: Option<ActionButton>,
    },
}

impl Delivery {
    pub fn recipient(&self) -> i64 {
        match self {
            Delivery::Photo { recipient, .. } | Delivery::Text { recipient, .. } => *recipient,
        }
    }

    pub fn action(&self) -> Option<&ActionButton> {
        match self {
            Delivery::Photo { action, .. } | Delivery::Text { action, .. } => action.as_ref(),
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Delivery::Photo { caption, .. } => caption,
            Delivery::Text { text, .. } => text,
        }
    }
}

/// Distributor that stores every delivery; recipients in `failing` get an error instead.
#[derive(Default)]
pub struct RecordingDistributor {
    pub sent: Mutex<Vec<Delivery>>,
    pub failing: Mutex<HashSet<i64>>,
}

impl RecordingDistributor {
    pub fn fail_for(&self, recipient: i64) {
        self.failing.lock().unwrap().insert(recipient);
    }

    pub fn take(&self) -> Vec<Delivery> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }

    pub fn sent_to(&self, recipient: i64) -> Vec<Delivery> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.recipient() == recipient)
            .cloned()
            .collect()
    }

    fn check(&self, recipient: i64) -> Result<(), Error> {
        if self.failing.lock().unwrap().contains(&recipient) {
            return Err(Error::Delivery(format!("user {} blocked the bot", recipient)));
        }
        Ok(())
    }
}

#[async_trait]
impl Distributor for RecordingDistributor {
    async fn send_photo(
        &self,
        recipient: i64,
        photo: &Path,
        caption: &str,
        action: Option<&ActionButton>,
    ) -> Result<(), Error> {
        self.check(recipient)?;
        self.sent.lock().unwrap().push(Delivery::Photo {
            recipient,
            photo: photo.to_path_buf(),
            caption: caption.to_string(),
            action: action.cloned(),
        });
        Ok(())
    }

    async fn send_text(&self, recipient: i64, text: &str, action: Option<&ActionButton>) -> Result<(), Error> {
        self.check(recipient)?;
        self.sent.lock().unwrap().push(Delivery::Text {
            recipient,
            text: text.to_string(),
            action: action.cloned(),
        });
        Ok(())
    }
}

/// Maps an image name to its would-be hidden path without touching the filesystem.
pub struct PathObscurer {
    pub library: ImageLibrary,
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl Obscurer for PathObscurer {
    async fn obscure(&self, image: &str) -> Result<PathBuf, Error> {
        self.calls.lock().unwrap().push(image.to_string());
        Ok(self.library.hidden_path(image))
    }
}

/// Records the tiles it was given and returns the output path without rendering.
#[derive(Default)]
pub struct RecordingComposer {
    pub tiles: Mutex<Vec<PathBuf>>,
}

#[async_trait]
impl CollageComposer for RecordingComposer {
    async fn compose(&self, tiles: &[PathBuf], output_name: &str) -> Result<PathBuf, Error> {
        *self.tiles.lock().unwrap() = tiles.to_vec();
        Ok(PathBuf::from("collages").join(output_name))
    }
}

/// Every repository, service and fake collaborator wired over one in-memory database.
pub struct TestApp {
    pub db: Database,
    pub library: ImageLibrary,
    pub settings: Arc<SqliteSettingsRepository>,
    pub users_repo: Arc<SqliteUserRepository>,
    pub points: Arc<SqlitePointsLedger>,
    pub catalog: Arc<SqliteCatalogRepository>,
    pub claims: Arc<SqliteClaimRepository>,
    pub re_offer_repo: Arc<SqliteReOfferRepository>,
    pub distributor: Arc<RecordingDistributor>,
    pub obscurer: Arc<PathObscurer>,
    pub composer: Arc<RecordingComposer>,
    pub users: Arc<UserService>,
    pub auction: Arc<AuctionService>,
    pub re_offers: Arc<ReOfferService>,
    pub admin: Arc<AdminService>,
    pub collection: Arc<CollectionService>,
    pub broadcast: Arc<BroadcastCycle>,
    pub interaction: Arc<InteractionService>,
}

impl TestApp {
    pub async fn new() -> Result<Self, Error> {
        let db = setup_test_database().await?;
        let pool = db.pool().clone();
        let library = ImageLibrary::new("img", "hidden_img", "collages");

        let settings = Arc::new(SqliteSettingsRepository::new(pool.clone()));
        let users_repo = Arc::new(SqliteUserRepository::new(pool.clone()));
        let points = Arc::new(SqlitePointsLedger::new(pool.clone()));
        let catalog = Arc::new(SqliteCatalogRepository::new(pool.clone()));
        let claims = Arc::new(SqliteClaimRepository::new(pool.clone()));
        let re_offer_repo = Arc::new(SqliteReOfferRepository::new(pool));

        let distributor = Arc::new(RecordingDistributor::default());
        let obscurer = Arc::new(PathObscurer {
            library: library.clone(),
            calls: Mutex::new(Vec::new()),
        });
        let composer = Arc::new(RecordingComposer::default());

        let users = Arc::new(UserService::new(users_repo.clone(), points.clone()));
        let auction = Arc::new(AuctionService::new(settings.clone(), catalog.clone(), claims.clone()));
        let re_offers = Arc::new(ReOfferService::new(settings.clone(), users_repo.clone(), re_offer_repo.clone()));
        let admin = Arc::new(AdminService::new(users_repo.clone(), settings.clone(), catalog.clone()));
        let collection = Arc::new(CollectionService::new(
            catalog.clone(),
            claims.clone(),
            points.clone(),
            obscurer.clone(),
            composer.clone(),
            library.clone(),
        ));
        let broadcast = Arc::new(BroadcastCycle::new(
            settings.clone(),
            catalog.clone(),
            claims.clone(),
            users_repo.clone(),
            obscurer.clone(),
            distributor.clone(),
        ));
        let interaction = Arc::new(InteractionService::new(
            users.clone(),
            auction.clone(),
            re_offers.clone(),
            admin.clone(),
            collection.clone(),
            broadcast.clone(),
            obscurer.clone(),
            distributor.clone(),
            library.clone(),
        ));

        Ok(Self {
            db,
            library,
            settings,
            users_repo,
            points,
            catalog,
            claims,
            re_offer_repo,
            distributor,
            obscurer,
            composer,
            users,
            auction,
            re_offers,
            admin,
            collection,
            broadcast,
            interaction,
        })
    }

    /// Registers `user_id` and returns it.
    pub async fn user(&self, user_id: i64) -> Result<i64, Error> {
        let name = format!("user{}", user_id);
        self.users_repo.register(user_id, Some(name.as_str())).await?;
        Ok(user_id)
    }

    pub async fn admin_user(&self, user_id: i64) -> Result<i64, Error> {
        self.user(user_id).await?;
        self.users_repo.set_admin(user_id).await?;
        Ok(user_id)
    }

    pub async fn set(&self, key: SettingKey, value: i64) -> Result<(), Error> {
        self.settings.set(key, &value.to_string()).await
    }
}
