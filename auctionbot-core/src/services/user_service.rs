use std::sync::Arc;

use tracing::{debug, info};

use auctionbot_common::models::{RatingEntry, User};
use auctionbot_common::traits::repository_traits::{PointsLedger, UserRepository};
use crate::Error;

/// Leaderboard length shown to users.
pub const RATING_LIMIT: i64 = 10;

pub struct UserService {
    users: Arc<dyn UserRepository + Send + Sync>,
    points: Arc<dyn PointsLedger + Send + Sync>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository + Send + Sync>,
        points: Arc<dyn PointsLedger + Send + Sync>,
    ) -> Self {
        debug!("Initializing UserService");
        Self { users, points }
    }

    /// Returns true if this call created the user.
    pub async fn register(&self, user_id: i64, user_name: Option<&str>) -> Result<bool, Error> {
        let created = self.users.register(user_id, user_name).await?;
        if created {
            info!("Registered user {} ({:?})", user_id, user_name);
        }
        Ok(created)
    }

    pub async fn get(&self, user_id: i64) -> Result<User, Error> {
        self.users
            .get(user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No user with id={}", user_id)))
    }

    pub async fn is_admin(&self, user_id: i64) -> Result<bool, Error> {
        self.users.is_admin(user_id).await
    }

    pub async fn balance(&self, user_id: i64) -> Result<i64, Error> {
        self.points.balance(user_id).await
    }

    pub async fn rating(&self) -> Result<Vec<RatingEntry>, Error> {
        self.users.rating(RATING_LIMIT).await
    }

    pub async fn recipients(&self) -> Result<Vec<i64>, Error> {
        self.users.list_ids().await
    }

    /// Makes sure each configured id exists and holds the admin flag.
    pub async fn bootstrap_admins(&self, admin_ids: &[i64]) -> Result<(), Error> {
        for &id in admin_ids {
            self.users.register(id, None).await?;
            self.users.set_admin(id).await?;
            info!("User {} has admin rights", id);
        }
        Ok(())
    }
}
