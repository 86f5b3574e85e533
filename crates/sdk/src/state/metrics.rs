use fastnum::{D256, dec256};
use serde::Serialize;

use super::MarketSummary;

// Ratio of the contract's 24-hour funding basis to the 8-hour basis.
const FUNDING_RESAMPLE: D256 = dec256!(3);
const DAYS_PER_YEAR: D256 = dec256!(365);
const PERCENT: D256 = dec256!(100);

/// Metrics derived from one [`MarketSummary`].
///
/// Computed exactly once by [`MarketMetrics::derive`] and never recomputed
/// in place; a new snapshot is produced if inputs change.
#[derive(Clone, Copy, derive_more::Debug, Serialize)]
pub struct MarketMetrics {
    #[debug("{long_oi}")]
    long_oi: D256,
    #[debug("{short_oi}")]
    short_oi: D256,
    #[debug("{eight_hr_funding_rate}")]
    eight_hr_funding_rate: D256,
    #[debug("{eight_hr_funding_velocity}")]
    eight_hr_funding_velocity: D256,
    #[debug("{yearly_funding_rate}")]
    yearly_funding_rate: D256,
    #[debug("{yearly_funding_velocity}")]
    yearly_funding_velocity: D256,
    #[debug("{relative_market_skew}")]
    relative_market_skew: D256,
    #[debug("{market_size_usd}")]
    market_size_usd: D256,
    #[debug("{market_skew_usd}")]
    market_skew_usd: D256,
    #[debug("{market_debt_usd}")]
    market_debt_usd: D256,
    #[debug("{long_oi_usd}")]
    long_oi_usd: D256,
    #[debug("{short_oi_usd}")]
    short_oi_usd: D256,
}

impl MarketMetrics {
    /// Derive all dependent fields, in fixed order: open interest split,
    /// funding resampling, relative skew, then USD conversion (which
    /// consumes the open interest values).
    pub fn derive(summary: &MarketSummary) -> Self {
        // The split holds algebraically for any sign of skew.
        let long_oi = (summary.market_size() + summary.market_skew()) / dec256!(2);
        let short_oi = summary.market_skew() - long_oi;

        let eight_hr_funding_rate = summary.current_funding_rate() / FUNDING_RESAMPLE;
        let eight_hr_funding_velocity = summary.current_funding_velocity() / FUNDING_RESAMPLE;
        let yearly_funding_rate = summary.current_funding_rate() * DAYS_PER_YEAR * PERCENT;
        let yearly_funding_velocity = summary.current_funding_velocity() * DAYS_PER_YEAR * PERCENT;

        // A market with zero size has no meaningful skew ratio; saturate
        // instead of dividing by zero.
        let relative_market_skew = if summary.market_size() == D256::ZERO {
            D256::ZERO
        } else {
            summary.market_skew() / summary.market_size()
        };

        let market_size_usd = summary.price() * summary.market_size();
        let market_skew_usd = summary.price() * summary.market_skew();
        let market_debt_usd = summary.price() * summary.market_debt();
        let long_oi_usd = summary.price() * long_oi;
        let short_oi_usd = summary.price() * short_oi;

        Self {
            long_oi,
            short_oi,
            eight_hr_funding_rate,
            eight_hr_funding_velocity,
            yearly_funding_rate,
            yearly_funding_velocity,
            relative_market_skew,
            market_size_usd,
            market_skew_usd,
            market_debt_usd,
            long_oi_usd,
            short_oi_usd,
        }
    }

    /// Long open interest, in units of the underlying asset.
    pub fn long_oi(&self) -> D256 { self.long_oi }

    /// Short open interest, in units of the underlying asset. Negative for
    /// net-long markets.
    pub fn short_oi(&self) -> D256 { self.short_oi }

    /// Funding rate resampled to the 8-hour basis.
    pub fn eight_hr_funding_rate(&self) -> D256 { self.eight_hr_funding_rate }

    /// Funding velocity resampled to the 8-hour basis.
    pub fn eight_hr_funding_velocity(&self) -> D256 { self.eight_hr_funding_velocity }

    /// Annualized funding rate, in percent.
    pub fn yearly_funding_rate(&self) -> D256 { self.yearly_funding_rate }

    /// Annualized funding velocity, in percent.
    pub fn yearly_funding_velocity(&self) -> D256 { self.yearly_funding_velocity }

    /// Skew relative to the market size; zero for empty markets.
    pub fn relative_market_skew(&self) -> D256 { self.relative_market_skew }

    pub fn market_size_usd(&self) -> D256 { self.market_size_usd }

    pub fn market_skew_usd(&self) -> D256 { self.market_skew_usd }

    pub fn market_debt_usd(&self) -> D256 { self.market_debt_usd }

    pub fn long_oi_usd(&self) -> D256 { self.long_oi_usd }

    pub fn short_oi_usd(&self) -> D256 { self.short_oi_usd }
}
