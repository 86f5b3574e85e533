use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Instant in chain history a snapshot is consistent with.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Eq, Ord, Hash, Default, Serialize)]
pub struct StateInstant {
    block_number: u64,
    block_timestamp: u64,
}

impl StateInstant {
    pub fn new(block_number: u64, block_timestamp: u64) -> Self {
        Self { block_number, block_timestamp }
    }

    pub fn block_number(&self) -> u64 { self.block_number }

    /// Unix timestamp (in seconds) of the block.
    pub fn block_timestamp(&self) -> u64 { self.block_timestamp }
}

impl Display for StateInstant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ts = DateTime::<Utc>::from_timestamp(self.block_timestamp as i64, 0)
            .unwrap_or_default()
            .format("%Y-%m-%d %H:%M:%S");
        write!(f, "#{} @ {}", self.block_number, ts)
    }
}
