//! Synthetix Perps V2 market data SDK.
//!
//! # Overview
//!
//! Decodes perpetual-futures market state from the on-chain
//! `PerpsV2MarketData` aggregator contract into flat, normalized snapshots.
//!
//! The aggregator returns self-describing nested structs. [`decode`] pairs
//! the depth-first leaf names declared by the contract interface document
//! with the depth-first leaves of the decoded return value, [`state`]
//! normalizes the fixed-point fields into decimal units and derives market
//! metrics (open interest split, funding resampling, skew ratios, USD
//! aggregates and batch shares), and [`pipe::MarketDataPipe`] orchestrates
//! one refresh cycle against a caller-supplied RPC provider.
//!
//! Use [`directory`] to bootstrap market proxy addresses from the Synthetix
//! deployment document.
//!
//! See `./tests` for examples.
//!
//! # Features
//!
//! | Feature | Default | Description |
//! | --- | --- | --- |
//! | `display` | yes | Enables [`std::fmt::Display`]/table rendering for state types. |

pub mod abi;
pub mod decode;
pub mod directory;
pub mod error;
pub mod num;
pub mod pipe;
pub mod state;
pub mod types;

use alloy::primitives::{Address, address};

/// Chain the market data aggregator is deployed on.
#[derive(Clone, Debug)]
pub struct Chain {
    chain_id: u64,
    market_data: Address,
}

impl Chain {
    /// Optimism mainnet, where Synthetix Perps V2 lives.
    pub fn optimism() -> Self {
        Self {
            chain_id: 10,
            market_data: address!("0x340B5d664834113735730Ad4aFb3760219Ad9112"),
        }
    }

    pub fn custom(chain_id: u64, market_data: Address) -> Self {
        Self { chain_id, market_data }
    }

    pub fn chain_id(&self) -> u64 { self.chain_id }

    /// Address of the `PerpsV2MarketData` aggregator contract.
    pub fn market_data(&self) -> Address { self.market_data }
}
