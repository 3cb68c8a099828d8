// src/server.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use auctionbot_core::tasks::spawn_broadcast_task;
use auctionbot_core::Database;

use crate::console::spawn_console_task;
use crate::context::ServerContext;
use crate::log_distributor::LogDistributor;
use crate::Args;

pub async fn run_server(args: Args) -> anyhow::Result<()> {
    // 1) Database + schema + default settings
    let db = Database::new(&args.db_path).await?;
    db.migrate().await?;

    // 2) Wire repositories and services
    let ctx = ServerContext::new(&args, db, Arc::new(LogDistributor));
    ctx.library.ensure_dirs().await?;

    // 3) Pick up images dropped into the source directory
    let added = ctx.catalog_service.ingest_directory().await?;
    info!("Catalog ingest added {} new item(s).", added);

    // 4) Admins from configuration
    ctx.user_service.bootstrap_admins(&args.admin).await?;
    if args.admin.is_empty() {
        info!("No admins configured; admin commands will be refused.");
    }

    // 5) Background tasks
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let broadcast_handle = spawn_broadcast_task(
        ctx.broadcast.clone(),
        Duration::from_secs(args.first_broadcast_delay),
        shutdown_rx.clone(),
    );
    let console_handle = if args.console {
        Some(spawn_console_task(ctx.interaction.clone(), shutdown_rx))
    } else {
        None
    };

    // 6) Run until ctrl-c
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C detected; shutting down..."),
        Err(e) => error!("Failed to listen for ctrl-c: {:?}", e),
    }
    let _ = shutdown_tx.send(true);

    // 7) Wait for tasks to finish
    if let Err(e) = broadcast_handle.await {
        error!("Broadcast task panicked: {:?}", e);
    }
    if let Some(handle) = console_handle {
        // stdin reads can block the runtime's blocking pool; don't wait on them
        handle.abort();
    }
    ctx.db.pool().close().await;

    info!("Server shut down cleanly.");
    Ok(())
}
