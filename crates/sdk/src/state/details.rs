use alloy::primitives::Address;
use fastnum::{D256, dec256};
use serde::Serialize;

use crate::{decode::FlatRecord, error::MarketDataError, types};

/// Per-market parameter record, as reported by `marketDetails(address)`.
///
/// The on-chain struct nests fee rates, limits, funding parameters and a
/// size breakdown (with a further nested long/short sides struct); the
/// decoded record is flat, so normalization reads leaf names directly.
#[derive(Clone, derive_more::Debug, Serialize)]
pub struct MarketDetails {
    #[serde(flatten)]
    instant: types::StateInstant,
    market: Address,
    base_asset: String,
    market_key: String,
    #[debug("{taker_fee}")]
    taker_fee: D256,
    #[debug("{maker_fee}")]
    maker_fee: D256,
    #[debug("{taker_fee_delayed_order}")]
    taker_fee_delayed_order: D256,
    #[debug("{maker_fee_delayed_order}")]
    maker_fee_delayed_order: D256,
    #[debug("{taker_fee_offchain_delayed_order}")]
    taker_fee_offchain_delayed_order: D256,
    #[debug("{maker_fee_offchain_delayed_order}")]
    maker_fee_offchain_delayed_order: D256,
    #[debug("{max_leverage}")]
    max_leverage: D256,
    #[debug("{max_market_value}")]
    max_market_value: D256,
    #[debug("{max_funding_velocity}")]
    max_funding_velocity: D256,
    #[debug("{skew_scale}")]
    skew_scale: D256,
    #[debug("{market_size}")]
    market_size: D256,
    #[debug("{long}")]
    long: D256,
    #[debug("{short}")]
    short: D256,
    #[debug("{market_debt}")]
    market_debt: D256,
    #[debug("{market_skew}")]
    market_skew: D256,
    #[debug("{price}")]
    price: D256,
    invalid: bool,
}

impl MarketDetails {
    /// Normalize one decoded details record.
    pub fn from_record(
        instant: types::StateInstant,
        record: &FlatRecord,
    ) -> Result<Self, MarketDataError> {
        Ok(Self {
            instant,
            market: record.address("market")?,
            base_asset: record.text("baseAsset")?,
            market_key: record.text("marketKey")?,
            taker_fee: record.wad("takerFee")?,
            maker_fee: record.wad("makerFee")?,
            taker_fee_delayed_order: record.wad("takerFeeDelayedOrder")?,
            maker_fee_delayed_order: record.wad("makerFeeDelayedOrder")?,
            taker_fee_offchain_delayed_order: record.wad("takerFeeOffchainDelayedOrder")?,
            maker_fee_offchain_delayed_order: record.wad("makerFeeOffchainDelayedOrder")?,
            max_leverage: record.wad("maxLeverage")?,
            max_market_value: record.wad("maxMarketValue")?,
            max_funding_velocity: record.wad("maxFundingVelocity")?,
            skew_scale: record.wad("skewScale")?,
            market_size: record.wad("marketSize")?,
            long: record.wad("long")?,
            short: record.wad("short")?,
            market_debt: record.wad("marketDebt")?,
            market_skew: record.wad("marketSkew")?,
            price: record.wad("price")?,
            invalid: record.flag("invalid")?,
        })
    }

    pub fn instant(&self) -> types::StateInstant { self.instant }

    pub fn market(&self) -> Address { self.market }

    pub fn base_asset(&self) -> &str { &self.base_asset }

    pub fn market_key(&self) -> &str { &self.market_key }

    pub fn taker_fee(&self) -> D256 { self.taker_fee }

    pub fn maker_fee(&self) -> D256 { self.maker_fee }

    pub fn taker_fee_delayed_order(&self) -> D256 { self.taker_fee_delayed_order }

    pub fn maker_fee_delayed_order(&self) -> D256 { self.maker_fee_delayed_order }

    pub fn taker_fee_offchain_delayed_order(&self) -> D256 {
        self.taker_fee_offchain_delayed_order
    }

    pub fn maker_fee_offchain_delayed_order(&self) -> D256 {
        self.maker_fee_offchain_delayed_order
    }

    pub fn max_leverage(&self) -> D256 { self.max_leverage }

    pub fn max_market_value(&self) -> D256 { self.max_market_value }

    pub fn max_funding_velocity(&self) -> D256 { self.max_funding_velocity }

    /// Skew denominator the contract uses for premium computation.
    pub fn skew_scale(&self) -> D256 { self.skew_scale }

    pub fn market_size(&self) -> D256 { self.market_size }

    /// Long side of the market, in units of the underlying asset.
    pub fn long(&self) -> D256 { self.long }

    /// Short side of the market, in units of the underlying asset.
    pub fn short(&self) -> D256 { self.short }

    pub fn market_debt(&self) -> D256 { self.market_debt }

    pub fn market_skew(&self) -> D256 { self.market_skew }

    pub fn price(&self) -> D256 { self.price }

    /// Oracle price validity flag, passed through unchanged.
    pub fn invalid(&self) -> bool { self.invalid }

    /// Premium as a fraction of `skewScale`; zero when the scale is unset.
    pub fn premium(&self) -> D256 {
        if self.skew_scale == D256::ZERO {
            D256::ZERO
        } else {
            self.market_skew / self.skew_scale
        }
    }

    /// Price a full skew rebalance would execute at.
    pub fn execution_price(&self) -> D256 {
        self.price * (D256::ONE + self.premium() / dec256!(2))
    }

    /// Relative price impact of a full skew rebalance; zero for an unpriced
    /// market.
    pub fn price_impact_full_rebalance(&self) -> D256 {
        if self.price == D256::ZERO {
            D256::ZERO
        } else {
            (self.execution_price() - self.price) / self.price
        }
    }
}

#[cfg(feature = "display")]
impl std::fmt::Display for MarketDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use colored::Colorize;

        writeln!(
            f,
            "{} ({}) {} {}",
            self.market_key.blue(),
            self.base_asset,
            self.market,
            if self.invalid { "INVALID PRICE ".bright_red() } else { Default::default() },
        )?;
        writeln!(
            f,
            "    Price: {} | Size: {} | Skew: {} | Debt: {}",
            self.price, self.market_size, self.market_skew, self.market_debt
        )?;
        writeln!(f, "    Long: {} | Short: {}", self.long, self.short)?;
        writeln!(
            f,
            "    Fees (taker/maker): {}/{} | Delayed: {}/{} | Offchain: {}/{}",
            self.taker_fee,
            self.maker_fee,
            self.taker_fee_delayed_order,
            self.maker_fee_delayed_order,
            self.taker_fee_offchain_delayed_order,
            self.maker_fee_offchain_delayed_order,
        )?;
        writeln!(
            f,
            "    Max leverage: {} | Max value: {} | Max funding velocity: {} | Skew scale: {}",
            self.max_leverage, self.max_market_value, self.max_funding_velocity, self.skew_scale
        )?;
        write!(
            f,
            "    Premium: {} | Execution price: {} | Full-rebalance impact: {}",
            self.premium(),
            self.execution_price(),
            self.price_impact_full_rebalance(),
        )
    }
}
