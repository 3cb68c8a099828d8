pub mod user_service;
pub mod auction_service;
pub mod re_offer_service;
pub mod admin_service;
pub mod catalog_service;
pub mod collection_service;
pub mod interaction_service;

pub use user_service::UserService;
pub use auction_service::AuctionService;
pub use re_offer_service::ReOfferService;
pub use admin_service::{AdminResponse, AdminService};
pub use catalog_service::CatalogService;
pub use collection_service::{CollectionService, CollectionView};
pub use interaction_service::InteractionService;
