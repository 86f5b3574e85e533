use alloy::primitives::Address;
use clap::{Parser, Subcommand};

pub(crate) const DEFAULT_RPC_PROVIDER: &str = "https://mainnet.optimism.io";
pub(crate) const DEFAULT_RPC_THROTTLING: u32 = 10;
pub(crate) const DEFAULT_DIRECTORY_FILE: &str = "data/perp_market_addresses.json";

#[derive(Parser, Debug)]
#[command(name = "perpsv2-cli", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// RPC endpoint to connect to
    #[arg(long, global = true, default_value_t = DEFAULT_RPC_PROVIDER.to_string())]
    pub rpc: String,

    /// RPC throttling (req/sec) [default: 10 for default RPC provider and
    /// none for custom]
    #[arg(long, global = true)]
    pub rpc_throttle: Option<u32>,

    /// PerpsV2MarketData aggregator address [default: Optimism mainnet
    /// deployment]
    #[arg(long, global = true)]
    pub market_data: Option<Address>,

    /// Block number to fetch state at [default: latest block]
    #[arg(long, global = true)]
    pub block: Option<u64>,

    /// Print flat JSON instead of tables
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch and render a snapshot of all market summaries
    Summaries {
        /// Include legacy (non-PERP) markets
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    /// Fetch parameter details for a single market proxy
    Details {
        /// Market proxy address
        market: Address,
    },
    /// Refresh the deployment directory and list Perps V2 market proxies
    Directory {
        /// Where to persist the fetched deployment document
        #[arg(long, default_value_t = DEFAULT_DIRECTORY_FILE.to_string())]
        file: String,

        /// Load the persisted document instead of fetching a fresh one
        #[arg(long, default_value_t = false)]
        offline: bool,
    },
    /// Periodically refresh market summaries until terminated (Ctrl+C)
    Watch {
        /// Refresh interval in seconds
        #[arg(long, default_value_t = 60)]
        interval: u64,

        /// Include legacy (non-PERP) markets
        #[arg(long, default_value_t = false)]
        all: bool,
    },
}
