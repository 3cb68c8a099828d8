// File: auctionbot-common/src/models/delivery.rs

use serde::{Deserialize, Serialize};

/// Per-batch tally from a broadcast. Failed recipients are listed, not retried.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: Vec<i64>,
}

impl DeliveryReport {
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed.len()
    }
}
