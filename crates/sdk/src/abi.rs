//! Contract interface documents for the on-chain data sources.

use alloy::json_abi::JsonAbi;

use crate::error::MarketDataError;

/// Interface document of the `PerpsV2MarketData` aggregator.
///
/// Describes `allMarketSummaries()` (struct array with a nested `feeRates`
/// struct) and `marketDetails(address)` (struct with nested parameter
/// structs, including the doubly nested `marketSizeDetails.sides`).
pub const PERPS_V2_MARKET_DATA: &str =
    include_str!("../../../abi/perps-v2/PerpsV2MarketData.json");

/// Parse the embedded `PerpsV2MarketData` interface document.
pub fn perps_v2_market_data() -> Result<JsonAbi, MarketDataError> {
    Ok(serde_json::from_str(PERPS_V2_MARKET_DATA)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_document_parses() {
        let abi = perps_v2_market_data().unwrap();
        assert!(abi.function("allMarketSummaries").is_some());
        assert!(abi.function("marketDetails").is_some());
    }
}
