use std::time::Duration;

use alloy::providers::Provider;
use perpsv2_sdk::pipe::MarketDataPipe;
use tokio_util::sync::CancellationToken;

use crate::summaries;

/// Refresh the latest market summaries on a fixed interval until cancelled.
pub(crate) async fn render<P: Provider>(
    pipe: &MarketDataPipe<P>,
    interval: u64,
    all: bool,
    json: bool,
    cancellation_token: CancellationToken,
) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));
    loop {
        tokio::select! {
            _ = cancellation_token.cancelled() => break,
            _ = ticker.tick() => {
                match pipe.all_market_summaries(None).await {
                    Ok(batch) => {
                        if json {
                            println!("{}", serde_json::to_string(&batch)?);
                        } else {
                            summaries::print_batch(&batch, all);
                        }
                    },
                    // Keep watching; the next tick gets a fresh chance.
                    Err(error) => eprintln!("refresh failed: {error:#}"),
                }
            },
        }
    }
    Ok(())
}
