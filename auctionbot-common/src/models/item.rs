// File: auctionbot-common/src/models/item.rs

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog entry. `image` is the file name inside the image directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: i64,
    pub image: String,
    /// True once the item has been drawn for a primary broadcast.
    pub consumed: bool,
    pub added_by: Option<i64>,
    pub added_at: DateTime<Utc>,
}

/// The item currently on air together with its obscured rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveItem {
    pub item: Item,
    pub obscured: PathBuf,
}

/// Result of one broadcast tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn {
        live: LiveItem,
        delivered: usize,
        failed: usize,
    },
    /// The catalog is empty even after recycling. Nothing was changed.
    CatalogExhausted,
}
