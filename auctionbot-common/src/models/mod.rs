// File: auctionbot-common/src/models/mod.rs
pub mod user;
pub mod item;
pub mod claim;
pub mod re_offer;
pub mod settings;
pub mod action;
pub mod intent;
pub mod delivery;

pub use user::{User, RatingEntry};
pub use item::{Item, LiveItem, DrawOutcome};
pub use claim::{Claim, ClaimOutcome};
pub use re_offer::{ReOffer, ReOfferEntryOutcome};
pub use settings::{AuctionSettings, SettingKey};
pub use action::{ActionButton, ActionToken};
pub use intent::{AdminCommand, Intent};
pub use delivery::DeliveryReport;
