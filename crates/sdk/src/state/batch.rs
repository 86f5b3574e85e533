use fastnum::D256;
use serde::Serialize;

use super::{MarketSnapshot, MarketSummary};
use crate::types;

/// Batch-wide USD totals over snapshots sharing one retrieval block.
#[derive(Clone, Copy, derive_more::Debug, Serialize)]
pub struct BatchTotals {
    #[debug("{total_market_size_usd}")]
    total_market_size_usd: D256,
    #[debug("{total_market_skew_usd}")]
    total_market_skew_usd: D256,
    #[debug("{total_long_oi_usd}")]
    total_long_oi_usd: D256,
    #[debug("{total_short_oi_usd}")]
    total_short_oi_usd: D256,
}

impl BatchTotals {
    /// Fold totals across all snapshots of a batch. Nothing reads the
    /// totals back until the fold is complete.
    pub fn fold<'a>(snapshots: impl IntoIterator<Item = &'a MarketSnapshot>) -> Self {
        let mut totals = Self {
            total_market_size_usd: D256::ZERO,
            total_market_skew_usd: D256::ZERO,
            total_long_oi_usd: D256::ZERO,
            total_short_oi_usd: D256::ZERO,
        };
        for snapshot in snapshots {
            let metrics = snapshot.metrics();
            totals.total_market_size_usd += metrics.market_size_usd();
            totals.total_market_skew_usd += metrics.market_skew_usd();
            totals.total_long_oi_usd += metrics.long_oi_usd();
            totals.total_short_oi_usd += metrics.short_oi_usd();
        }
        totals
    }

    /// Proportional share of each total for one snapshot.
    ///
    /// A zero group total (an empty batch, or one where every market nets
    /// out to zero) saturates the share to zero, consistent with the
    /// relative-skew policy for empty markets.
    pub fn shares_for(&self, snapshot: &MarketSnapshot) -> BatchShares {
        let metrics = snapshot.metrics();
        BatchShares {
            proportional_market_size_usd: proportion(
                metrics.market_size_usd(),
                self.total_market_size_usd,
            ),
            proportional_market_skew_usd: proportion(
                metrics.market_skew_usd(),
                self.total_market_skew_usd,
            ),
            proportional_long_oi_usd: proportion(metrics.long_oi_usd(), self.total_long_oi_usd),
            proportional_short_oi_usd: proportion(metrics.short_oi_usd(), self.total_short_oi_usd),
        }
    }

    pub fn total_market_size_usd(&self) -> D256 { self.total_market_size_usd }

    pub fn total_market_skew_usd(&self) -> D256 { self.total_market_skew_usd }

    pub fn total_long_oi_usd(&self) -> D256 { self.total_long_oi_usd }

    pub fn total_short_oi_usd(&self) -> D256 { self.total_short_oi_usd }
}

fn proportion(part: D256, total: D256) -> D256 {
    if total == D256::ZERO { D256::ZERO } else { part / total }
}

/// One market's share of its batch totals.
#[derive(Clone, Copy, derive_more::Debug, Serialize)]
pub struct BatchShares {
    #[debug("{proportional_market_size_usd}")]
    proportional_market_size_usd: D256,
    #[debug("{proportional_market_skew_usd}")]
    proportional_market_skew_usd: D256,
    #[debug("{proportional_long_oi_usd}")]
    proportional_long_oi_usd: D256,
    #[debug("{proportional_short_oi_usd}")]
    proportional_short_oi_usd: D256,
}

impl BatchShares {
    pub fn proportional_market_size_usd(&self) -> D256 { self.proportional_market_size_usd }

    pub fn proportional_market_skew_usd(&self) -> D256 { self.proportional_market_skew_usd }

    pub fn proportional_long_oi_usd(&self) -> D256 { self.proportional_long_oi_usd }

    pub fn proportional_short_oi_usd(&self) -> D256 { self.proportional_short_oi_usd }
}

/// One refresh cycle of market snapshots sharing a retrieval block, with
/// batch totals and per-market shares populated.
#[derive(Clone, Debug, Serialize)]
pub struct MarketBatch {
    #[serde(flatten)]
    instant: types::StateInstant,
    totals: BatchTotals,
    markets: Vec<MarketSnapshot>,
}

impl MarketBatch {
    /// Derive snapshots from normalized summaries, then aggregate in two
    /// passes: fold totals across the whole batch, then attach each
    /// snapshot's proportional shares. Totals are immutable after the fold.
    pub fn new(instant: types::StateInstant, summaries: Vec<MarketSummary>) -> Self {
        let snapshots: Vec<MarketSnapshot> =
            summaries.into_iter().map(MarketSnapshot::new).collect();
        let totals = BatchTotals::fold(&snapshots);
        let markets = snapshots
            .into_iter()
            .map(|snapshot| {
                let shares = totals.shares_for(&snapshot);
                snapshot.with_shares(shares)
            })
            .collect();
        Self { instant, totals, markets }
    }

    pub fn instant(&self) -> types::StateInstant { self.instant }

    pub fn totals(&self) -> BatchTotals { self.totals }

    /// Snapshots in contract iteration order.
    pub fn markets(&self) -> &[MarketSnapshot] { &self.markets }

    /// Snapshots of active Perps V2 markets only (`PERP`-suffixed keys).
    pub fn perps_v2_markets(&self) -> impl Iterator<Item = &MarketSnapshot> {
        self.markets.iter().filter(|snapshot| snapshot.summary().is_perps_v2())
    }
}

#[cfg(test)]
mod tests {
    use fastnum::dec256;

    use super::*;

    fn batch(summaries: Vec<MarketSummary>) -> MarketBatch {
        MarketBatch::new(types::StateInstant::new(1, 1_700_000_000), summaries)
    }

    #[test]
    fn folds_totals_across_batch() {
        let batch = batch(vec![
            MarketSummary::for_testing(dec256!(2000), dec256!(1000), dec256!(200)),
            MarketSummary::for_testing(dec256!(100), dec256!(20000), dec256!(-1000)),
        ]);
        let totals = batch.totals();
        assert_eq!(totals.total_market_size_usd(), dec256!(4000000));
        assert_eq!(totals.total_market_skew_usd(), dec256!(300000));
        // long OI: 600 * 2000 + 9500 * 100
        assert_eq!(totals.total_long_oi_usd(), dec256!(2150000));
        assert_eq!(totals.total_short_oi_usd(), dec256!(-1850000));
    }

    #[test]
    fn shares_sum_to_one_when_totals_are_nonzero() {
        let batch = batch(vec![
            MarketSummary::for_testing(dec256!(2000), dec256!(1000), dec256!(200)),
            MarketSummary::for_testing(dec256!(100), dec256!(20000), dec256!(1000)),
            MarketSummary::for_testing(dec256!(30000), dec256!(50), dec256!(10)),
        ]);

        let mut size_share_sum = fastnum::D256::ZERO;
        let mut long_share_sum = fastnum::D256::ZERO;
        for snapshot in batch.markets() {
            let shares = snapshot.shares().unwrap();
            size_share_sum += shares.proportional_market_size_usd();
            long_share_sum += shares.proportional_long_oi_usd();
        }
        let tolerance = dec256!(0.000000000000000000000000000001);
        assert!((size_share_sum - dec256!(1)).abs() < tolerance);
        assert!((long_share_sum - dec256!(1)).abs() < tolerance);
    }

    #[test]
    fn share_of_single_market_batch_is_one() {
        let batch = batch(vec![MarketSummary::for_testing(
            dec256!(2000),
            dec256!(1000),
            dec256!(200),
        )]);
        let shares = batch.markets()[0].shares().unwrap();
        assert_eq!(shares.proportional_market_size_usd(), dec256!(1));
        assert_eq!(shares.proportional_market_skew_usd(), dec256!(1));
    }

    #[test]
    fn zero_totals_saturate_shares() {
        // Both markets are empty, so every total is zero.
        let batch = batch(vec![
            MarketSummary::for_testing(dec256!(2000), dec256!(0), dec256!(0)),
            MarketSummary::for_testing(dec256!(100), dec256!(0), dec256!(0)),
        ]);
        for snapshot in batch.markets() {
            let shares = snapshot.shares().unwrap();
            assert_eq!(shares.proportional_market_size_usd(), fastnum::D256::ZERO);
            assert_eq!(shares.proportional_market_skew_usd(), fastnum::D256::ZERO);
            assert_eq!(shares.proportional_long_oi_usd(), fastnum::D256::ZERO);
            assert_eq!(shares.proportional_short_oi_usd(), fastnum::D256::ZERO);
        }
    }

    #[test]
    fn empty_batch_aggregates_to_zero() {
        let batch = batch(Vec::new());
        assert!(batch.markets().is_empty());
        assert_eq!(batch.totals().total_market_size_usd(), fastnum::D256::ZERO);
    }

    #[test]
    fn perps_v2_filter() {
        let batch = batch(vec![
            MarketSummary::for_testing(dec256!(1), dec256!(1), dec256!(0)),
            MarketSummary::for_testing(dec256!(1), dec256!(1), dec256!(0)).with_key("sETH"),
        ]);
        assert_eq!(batch.markets().len(), 2);
        assert_eq!(batch.perps_v2_markets().count(), 1);
    }
}
