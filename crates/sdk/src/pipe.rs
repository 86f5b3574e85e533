//! Market data pipeline over an RPC provider.

use alloy::{
    dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt},
    eips::{BlockId, BlockNumberOrTag},
    json_abi::{Function, JsonAbi},
    network::TransactionBuilder,
    primitives::Address,
    providers::Provider,
    rpc::types::TransactionRequest,
};
use futures::future::try_join_all;

use crate::{
    Chain, abi, decode,
    error::MarketDataError,
    state::{MarketBatch, MarketDetails, MarketSummary},
    types::StateInstant,
};

/// Function the aggregator reports all market summaries through.
pub const ALL_MARKET_SUMMARIES: &str = "allMarketSummaries";
/// Function the aggregator reports a single market's parameters through.
pub const MARKET_DETAILS: &str = "marketDetails";

/// One-shot market data pipeline against the aggregator contract.
///
/// The provider (with its retry/throttle layers) is built and owned by the
/// caller and passed in explicitly; the pipe itself never retries.
#[derive(Clone, Debug)]
pub struct MarketDataPipe<P> {
    provider: P,
    chain: Chain,
    abi: JsonAbi,
}

impl<P: Provider> MarketDataPipe<P> {
    pub fn new(chain: Chain, provider: P) -> Result<Self, MarketDataError> {
        Ok(Self { provider, chain, abi: abi::perps_v2_market_data()? })
    }

    pub fn chain(&self) -> &Chain { &self.chain }

    /// Resolve the retrieval context for a historical block, or the latest
    /// block when `None`.
    pub async fn instant_at(&self, block: Option<u64>) -> Result<StateInstant, MarketDataError> {
        let tag = block.map(BlockNumberOrTag::Number).unwrap_or(BlockNumberOrTag::Latest);
        let header = self
            .provider
            .get_block_by_number(tag)
            .await?
            .ok_or(MarketDataError::BlockNotFound(tag))?
            .header;
        Ok(StateInstant::new(header.number, header.timestamp))
    }

    /// Summaries of every listed market at one block, normalized, derived
    /// and aggregated into a [`MarketBatch`].
    ///
    /// A record that fails to decode is reported and skipped, so one
    /// drifted market cannot sink the whole refresh cycle.
    pub async fn all_market_summaries(
        &self,
        block: Option<u64>,
    ) -> Result<MarketBatch, MarketDataError> {
        let instant = self.instant_at(block).await?;
        let output = self.call(ALL_MARKET_SUMMARIES, &[], instant).await?;
        let DynSolValue::Array(elements) = output else {
            return Err(MarketDataError::UnexpectedOutput {
                function: ALL_MARKET_SUMMARIES.to_owned(),
            });
        };

        let names = decode::extract_names(&self.abi, ALL_MARKET_SUMMARIES)?;
        let mut summaries = Vec::with_capacity(elements.len());
        for (index, element) in elements.into_iter().enumerate() {
            let summary =
                decode::FlatRecord::from_parts(ALL_MARKET_SUMMARIES, &names, decode::flatten(element))
                    .and_then(|record| MarketSummary::from_record(instant, &record));
            match summary {
                Ok(summary) => summaries.push(summary),
                Err(error) => tracing::warn!(
                    function = ALL_MARKET_SUMMARIES,
                    block = instant.block_number(),
                    index,
                    %error,
                    "skipping undecodable market record"
                ),
            }
        }
        Ok(MarketBatch::new(instant, summaries))
    }

    /// Parameter details of a single market at one block.
    pub async fn market_details(
        &self,
        market: Address,
        block: Option<u64>,
    ) -> Result<MarketDetails, MarketDataError> {
        let instant = self.instant_at(block).await?;
        self.market_details_at(market, instant).await
    }

    /// Parameter details of a single market at an already resolved instant.
    pub async fn market_details_at(
        &self,
        market: Address,
        instant: StateInstant,
    ) -> Result<MarketDetails, MarketDataError> {
        let output = self
            .call(MARKET_DETAILS, &[DynSolValue::Address(market)], instant)
            .await?;
        let record = decode::assemble(&self.abi, MARKET_DETAILS, output)?;
        MarketDetails::from_record(instant, &record)
    }

    /// Details of many markets, fetched concurrently against one block.
    ///
    /// Records are independent; the only join point is collecting the
    /// results.
    pub async fn all_market_details(
        &self,
        markets: &[Address],
        block: Option<u64>,
    ) -> Result<Vec<MarketDetails>, MarketDataError> {
        let instant = self.instant_at(block).await?;
        try_join_all(markets.iter().map(|market| self.market_details_at(*market, instant))).await
    }

    fn function(&self, name: &str) -> Result<&Function, MarketDataError> {
        self.abi
            .function(name)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| MarketDataError::SchemaNotFound(name.to_owned()))
    }

    /// eth_call against the aggregator at the instant's block, decoded into
    /// the function's single output value.
    async fn call(
        &self,
        name: &str,
        args: &[DynSolValue],
        instant: StateInstant,
    ) -> Result<DynSolValue, MarketDataError> {
        let function = self.function(name)?;
        let calldata = function.abi_encode_input(args)?;
        let request = TransactionRequest::default()
            .with_to(self.chain.market_data())
            .with_input(calldata);
        let returndata = self
            .provider
            .call(request)
            .block(BlockId::number(instant.block_number()))
            .await?;
        tracing::debug!(
            function = name,
            block = instant.block_number(),
            bytes = returndata.len(),
            "aggregator call returned"
        );
        let mut outputs = function.abi_decode_output(&returndata)?;
        if outputs.len() != 1 {
            return Err(MarketDataError::UnexpectedOutput { function: name.to_owned() });
        }
        Ok(outputs.remove(0))
    }
}
