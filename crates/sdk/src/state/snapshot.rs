use serde::Serialize;

use super::{BatchShares, MarketMetrics, MarketSummary};

/// Fully derived market snapshot: the normalized summary plus derived
/// metrics and, once batch aggregation ran, the market's share of the
/// batch totals.
///
/// Serializes as one flat object so downstream consumers never need
/// schema-aware decoding.
#[derive(Clone, derive_more::Debug, Serialize)]
pub struct MarketSnapshot {
    #[serde(flatten)]
    summary: MarketSummary,
    #[serde(flatten)]
    metrics: MarketMetrics,
    #[serde(flatten)]
    shares: Option<BatchShares>,
}

impl MarketSnapshot {
    /// Build the immutable base, then run derivation exactly once.
    pub fn new(summary: MarketSummary) -> Self {
        let metrics = MarketMetrics::derive(&summary);
        Self { summary, metrics, shares: None }
    }

    pub fn summary(&self) -> &MarketSummary { &self.summary }

    pub fn metrics(&self) -> &MarketMetrics { &self.metrics }

    /// Share of the batch totals; populated by [`super::MarketBatch`],
    /// absent for snapshots outside a batch.
    pub fn shares(&self) -> Option<&BatchShares> { self.shares.as_ref() }

    pub(crate) fn with_shares(self, shares: BatchShares) -> Self {
        Self { shares: Some(shares), ..self }
    }
}

#[cfg(feature = "display")]
impl std::fmt::Display for MarketSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use colored::Colorize;

        let skew = self.summary.market_skew();
        write!(
            f,
            "{} ({}) px:{:.2} size:{:.2} skew:{} 8h:{} apr:{:.2}%",
            self.summary.key().blue(),
            self.summary.asset(),
            self.summary.price(),
            self.summary.market_size(),
            if skew.is_negative() {
                skew.to_string().red()
            } else {
                skew.to_string().green()
            },
            self.metrics.eight_hr_funding_rate(),
            self.metrics.yearly_funding_rate(),
        )
    }
}

#[cfg(feature = "display")]
impl tabled::Tabled for MarketSnapshot {
    const LENGTH: usize = 11;

    fn fields(&self) -> Vec<std::borrow::Cow<'_, str>> {
        use colored::Colorize;
        use fastnum::{D256, dec256};

        let signed = |value: D256| {
            if value.is_negative() {
                value.to_string().red().to_string()
            } else {
                value.to_string().green().to_string()
            }
        };

        vec![
            self.summary.key().to_owned().into(),
            self.summary.asset().to_owned().into(),
            format!("{:.2}", self.summary.price()).into(),
            format!("{:.2}", self.summary.market_size()).into(),
            signed(self.summary.market_skew()).into(),
            format!("{:.4}", self.metrics.relative_market_skew() * dec256!(100)).into(),
            signed(self.metrics.eight_hr_funding_rate()).into(),
            signed(self.metrics.yearly_funding_rate()).into(),
            format!("{:.2}", self.metrics.long_oi()).into(),
            format!("{:.2}", self.metrics.short_oi()).into(),
            format!("{:.0}", self.metrics.market_size_usd()).into(),
        ]
    }

    fn headers() -> Vec<std::borrow::Cow<'static, str>> {
        vec![
            "Key".into(),
            "Asset".into(),
            "Price".into(),
            "Size".into(),
            "Skew".into(),
            "Skew %".into(),
            "8h Funding".into(),
            "APR %".into(),
            "Long OI".into(),
            "Short OI".into(),
            "Size USD".into(),
        ]
    }
}
