// src/repositories/sqlite/mod.rs
pub mod settings;
pub mod user;
pub mod points;
pub mod catalog;
pub mod claims;
pub mod re_offer;

pub use settings::SqliteSettingsRepository;
pub use user::SqliteUserRepository;
pub use points::SqlitePointsLedger;
pub use catalog::SqliteCatalogRepository;
pub use claims::SqliteClaimRepository;
pub use re_offer::SqliteReOfferRepository;
