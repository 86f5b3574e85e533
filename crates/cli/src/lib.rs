pub mod args;
mod details;
mod directory;
mod summaries;
mod watch;

use std::time::Duration;

use alloy::{
    providers::{Provider, ProviderBuilder},
    rpc::client::RpcClient,
    transports::layers::{RetryBackoffLayer, ThrottleLayer},
};
use anyhow::Context;
use args::{Cli, Commands};
use perpsv2_sdk::{Chain, pipe::MarketDataPipe};
use tokio_util::sync::CancellationToken;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    // The directory command is purely HTTP + filesystem; skip the RPC setup.
    if let Commands::Directory { file, offline } = &cli.command {
        return directory::render(file, *offline, cli.json).await;
    }

    let client = if cli.rpc == args::DEFAULT_RPC_PROVIDER || cli.rpc_throttle.is_some() {
        // Apply throttling with default RPC
        RpcClient::builder()
            .layer(ThrottleLayer::new(cli.rpc_throttle.unwrap_or(args::DEFAULT_RPC_THROTTLING)))
            .layer(RetryBackoffLayer::new(10, 100, 200))
            .connect(&cli.rpc)
            .await
            .context("connecting to RPC")?
    } else {
        RpcClient::builder()
            .layer(RetryBackoffLayer::new(10, 100, 200))
            .connect(&cli.rpc)
            .await
            .context("connecting to RPC")?
    };
    client.set_poll_interval(Duration::from_millis(100));
    let provider = ProviderBuilder::new().connect_client(client);

    let chain = match cli.market_data {
        Some(market_data) => Chain::custom(provider.get_chain_id().await?, market_data),
        None => Chain::optimism(),
    };
    let pipe = MarketDataPipe::new(chain, provider).context("loading interface document")?;

    let cancellation_signal = CancellationToken::new();
    let cancellation_token = cancellation_signal.child_token();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C signal handler");
        cancellation_signal.cancel();
    });

    match &cli.command {
        Commands::Summaries { all } => summaries::render(&pipe, cli.block, *all, cli.json).await?,
        Commands::Details { market } => details::render(&pipe, *market, cli.block, cli.json).await?,
        Commands::Directory { .. } => unreachable!("handled above"),
        Commands::Watch { interval, all } => {
            watch::render(&pipe, *interval, *all, cli.json, cancellation_token).await?
        },
    }

    Ok(())
}
