// src/repositories/mod.rs
pub mod sqlite;

pub use sqlite::{
    SqliteCatalogRepository, SqliteClaimRepository, SqlitePointsLedger, SqliteReOfferRepository,
    SqliteSettingsRepository, SqliteUserRepository,
};
