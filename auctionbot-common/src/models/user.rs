// File: auctionbot-common/src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat participant. The id is assigned by the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub user_name: Option<String>,
    /// Never negative; only the points ledger moves it.
    pub points: i64,
    pub is_admin: bool,
    pub registered_at: DateTime<Utc>,
}

/// One leaderboard line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub user_id: i64,
    pub user_name: Option<String>,
    pub claims: i64,
    pub points: i64,
}

impl RatingEntry {
    pub fn display_name(&self) -> String {
        match &self.user_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("user {}", self.user_id),
        }
    }
}
