use alloy::{primitives::Address, providers::Provider};
use anyhow::Context;
use perpsv2_sdk::pipe::MarketDataPipe;

pub(crate) async fn render<P: Provider>(
    pipe: &MarketDataPipe<P>,
    market: Address,
    block: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let details = pipe
        .market_details(market, block)
        .await
        .context("fetching market details")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&details)?);
    } else {
        println!("{}", details);
    }
    Ok(())
}
