// File: auctionbot-common/src/traits/mod.rs
pub mod repository_traits;
pub mod delivery_traits;
