//! Normalized market state and derived metrics.

mod batch;
mod details;
mod metrics;
mod snapshot;
mod summary;

pub use batch::{BatchShares, BatchTotals, MarketBatch};
pub use details::MarketDetails;
pub use metrics::MarketMetrics;
pub use snapshot::MarketSnapshot;
pub use summary::MarketSummary;
