use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

mod console;
mod context;
mod log_distributor;
mod server;

#[derive(Parser, Debug, Clone)]
#[command(name = "auctionbot")]
#[command(author, version, about = "AuctionBot - blind image auction chat bot")]
pub struct Args {
    /// SQLite database file, or ":memory:".
    #[arg(long, env = "AUCTIONBOT_DB_PATH", default_value = "data/auction.db")]
    pub db_path: String,

    /// Directory holding the original prize images.
    #[arg(long, env = "AUCTIONBOT_IMAGE_DIR", default_value = "img")]
    pub image_dir: PathBuf,

    /// Where obscured previews are written.
    #[arg(long, env = "AUCTIONBOT_HIDDEN_DIR", default_value = "hidden_img")]
    pub hidden_dir: PathBuf,

    #[arg(long, env = "AUCTIONBOT_COLLAGE_DIR", default_value = "collages")]
    pub collage_dir: PathBuf,

    /// User ids granted admin rights at startup, comma separated.
    #[arg(long, env = "AUCTIONBOT_ADMINS", value_delimiter = ',')]
    pub admin: Vec<i64>,

    /// Seconds before the first broadcast.
    #[arg(long, default_value_t = 5)]
    pub first_broadcast_delay: u64,

    /// Read "<user_id> <command or button token>" lines from stdin.
    #[arg(long, default_value = "false")]
    pub console: bool,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("auctionbot=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();
    info!(
        "AuctionBot starting. db={}, images={:?}, console={}",
        args.db_path, args.image_dir, args.console
    );

    if let Err(e) = server::run_server(args).await {
        error!("Server error: {:?}", e);
        return Err(e);
    }

    info!("Main finished. Goodbye!");
    Ok(())
}
