// ================================================================
// File: auctionbot-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not found error: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    /// A stored setting could not be read as the type its consumer expects.
    #[error("Invalid setting {name}='{value}'")]
    InvalidSetting { name: String, value: String },

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Parse(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Parse(s.to_string())
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Self {
        Error::Parse(err.to_string())
    }
}
