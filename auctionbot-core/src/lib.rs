// src/lib.rs

pub mod db;
pub mod repositories;
pub mod services;
pub mod tasks;
pub mod imaging;
pub mod utils;
pub mod test_utils;

pub use db::Database;
pub use auctionbot_common::error::Error;
