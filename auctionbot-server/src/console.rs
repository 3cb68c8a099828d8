// src/console.rs

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use auctionbot_core::services::InteractionService;

/// Splits "<user_id> <text>" into its parts.
fn parse_line(line: &str) -> Option<(i64, &str)> {
    let (id, rest) = line.trim().split_once(char::is_whitespace)?;
    let user_id = id.parse::<i64>().ok()?;
    let text = rest.trim();
    if text.is_empty() {
        return None;
    }
    Some((user_id, text))
}

/// Feeds stdin lines to the interaction handler until EOF or shutdown.
pub fn spawn_console_task(
    interaction: Arc<InteractionService>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Console ready. Type \"<user_id> <command or button token>\".");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = tokio::select! {
                line = lines.next_line() => line,
                _ = shutdown_rx.changed() => break,
            };

            match line {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let Some((user_id, text)) = parse_line(&line) else {
                        warn!("Ignoring console line '{}'", line);
                        continue;
                    };
                    if let Err(e) = interaction.handle_text(user_id, text).await {
                        error!("Handling '{}' for user {} failed: {:?}", text, user_id, e);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!("Console read error: {:?}", e);
                    break;
                }
            }
        }
        info!("Console closed.");
    })
}
