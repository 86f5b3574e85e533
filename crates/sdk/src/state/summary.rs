use alloy::primitives::Address;
use fastnum::D256;
use serde::Serialize;

use crate::{decode::FlatRecord, error::MarketDataError, types};

/// Normalized per-market summary, as reported by `allMarketSummaries`.
///
/// Magnitude fields are decimal units with the wad scaling applied;
/// byte-string identifiers are decoded and trimmed. Funding rate and
/// velocity are on the 24-hour basis the contract reports.
#[derive(Clone, derive_more::Debug, Serialize)]
pub struct MarketSummary {
    #[serde(flatten)]
    instant: types::StateInstant,
    market: Address,
    asset: String,
    key: String,
    #[debug("{max_leverage}")]
    max_leverage: D256,
    #[debug("{price}")]
    price: D256,
    #[debug("{market_size}")]
    market_size: D256,
    #[debug("{market_skew}")]
    market_skew: D256,
    #[debug("{market_debt}")]
    market_debt: D256,
    #[debug("{current_funding_rate}")]
    current_funding_rate: D256,
    #[debug("{current_funding_velocity}")]
    current_funding_velocity: D256,
    #[debug("{taker_fee_offchain_delayed_order}")]
    taker_fee_offchain_delayed_order: D256,
    #[debug("{maker_fee_offchain_delayed_order}")]
    maker_fee_offchain_delayed_order: D256,
}

impl MarketSummary {
    /// Normalize one decoded summary record.
    ///
    /// Fails if an expected field is missing or mistyped; the record is
    /// unusable without it.
    pub fn from_record(
        instant: types::StateInstant,
        record: &FlatRecord,
    ) -> Result<Self, MarketDataError> {
        Ok(Self {
            instant,
            market: record.address("market")?,
            asset: record.text("asset")?,
            key: record.text("key")?,
            max_leverage: record.wad("maxLeverage")?,
            price: record.wad("price")?,
            market_size: record.wad("marketSize")?,
            market_skew: record.wad("marketSkew")?,
            market_debt: record.wad("marketDebt")?,
            current_funding_rate: record.wad("currentFundingRate")?,
            current_funding_velocity: record.wad("currentFundingVelocity")?,
            taker_fee_offchain_delayed_order: record.wad("takerFeeOffchainDelayedOrder")?,
            maker_fee_offchain_delayed_order: record.wad("makerFeeOffchainDelayedOrder")?,
        })
    }

    /// Instant the summary was retrieved at.
    pub fn instant(&self) -> types::StateInstant { self.instant }

    /// Address of the market proxy contract.
    pub fn market(&self) -> Address { self.market }

    /// Underlying asset symbol (e.g. `sETH`).
    pub fn asset(&self) -> &str { &self.asset }

    /// Market key (e.g. `sETHPERP`).
    pub fn key(&self) -> &str { &self.key }

    /// Active Perps V2 markets carry a `PERP`-suffixed key; anything else is
    /// a legacy v1 listing.
    pub fn is_perps_v2(&self) -> bool { self.key.ends_with("PERP") }

    pub fn max_leverage(&self) -> D256 { self.max_leverage }

    /// Oracle price of the underlying asset, in sUSD.
    pub fn price(&self) -> D256 { self.price }

    /// Total market size, in units of the underlying asset.
    pub fn market_size(&self) -> D256 { self.market_size }

    /// Signed imbalance between long and short open interest.
    pub fn market_skew(&self) -> D256 { self.market_skew }

    pub fn market_debt(&self) -> D256 { self.market_debt }

    /// Funding rate on the 24-hour basis.
    pub fn current_funding_rate(&self) -> D256 { self.current_funding_rate }

    /// Rate of change of the funding rate (proportional skew times max
    /// funding velocity), 24-hour basis.
    pub fn current_funding_velocity(&self) -> D256 { self.current_funding_velocity }

    pub fn taker_fee_offchain_delayed_order(&self) -> D256 {
        self.taker_fee_offchain_delayed_order
    }

    pub fn maker_fee_offchain_delayed_order(&self) -> D256 {
        self.maker_fee_offchain_delayed_order
    }
}

#[cfg(test)]
impl MarketSummary {
    pub(crate) fn for_testing(price: D256, market_size: D256, market_skew: D256) -> Self {
        Self {
            instant: types::StateInstant::new(0, 0),
            market: Address::ZERO,
            asset: "sETH".to_owned(),
            key: "sETHPERP".to_owned(),
            max_leverage: fastnum::dec256!(25),
            price,
            market_size,
            market_skew,
            market_debt: D256::ZERO,
            current_funding_rate: D256::ZERO,
            current_funding_velocity: D256::ZERO,
            taker_fee_offchain_delayed_order: D256::ZERO,
            maker_fee_offchain_delayed_order: D256::ZERO,
        }
    }

    pub(crate) fn with_funding(mut self, rate: D256, velocity: D256) -> Self {
        self.current_funding_rate = rate;
        self.current_funding_velocity = velocity;
        self
    }

    pub(crate) fn with_debt(mut self, debt: D256) -> Self {
        self.market_debt = debt;
        self
    }

    pub(crate) fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_owned();
        self
    }
}
