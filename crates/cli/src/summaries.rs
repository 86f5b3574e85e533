use alloy::providers::Provider;
use anyhow::Context;
use colored::Colorize;
use itertools::Itertools;
use perpsv2_sdk::{pipe::MarketDataPipe, state::MarketBatch};
use tabled::{Table, settings::Style};

pub(crate) async fn render<P: Provider>(
    pipe: &MarketDataPipe<P>,
    block: Option<u64>,
    all: bool,
    json: bool,
) -> anyhow::Result<()> {
    let batch = pipe
        .all_market_summaries(block)
        .await
        .context("fetching market summaries")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
        return Ok(());
    }

    print_batch(&batch, all);
    Ok(())
}

pub(crate) fn print_batch(batch: &MarketBatch, all: bool) {
    println!(
        "{}\n",
        format!("{:#^120}", format!(" Perps V2 Markets {} ", batch.instant()))
            .bold()
            .purple()
    );

    let markets = batch
        .markets()
        .iter()
        .filter(|snapshot| all || snapshot.summary().is_perps_v2())
        .sorted_by(|a, b| {
            b.metrics()
                .market_size_usd()
                .partial_cmp(&a.metrics().market_size_usd())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .collect::<Vec<_>>();

    let mut table = Table::new(markets);
    table.with(Style::sharp());
    println!("{table}");

    let totals = batch.totals();
    println!(
        "\nTotals (USD): size {} | skew {} | long OI {} | short OI {}",
        totals.total_market_size_usd(),
        totals.total_market_skew_usd(),
        totals.total_long_oi_usd().to_string().green(),
        totals.total_short_oi_usd().to_string().red(),
    );
}
