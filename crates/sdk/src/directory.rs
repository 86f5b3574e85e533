//! Synthetix deployment directory bootstrap.
//!
//! Market proxy addresses come from the published `deployment.json`
//! document; refreshing it periodically keeps the market list current.

use std::collections::BTreeMap;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::MarketDataError;

/// Canonical deployment document for Synthetix on Optimism mainnet.
pub const DEPLOYMENT_URL: &str = "https://raw.githubusercontent.com/Synthetixio/synthetix/develop/publish/deployed/mainnet-ovm/deployment.json";

// Perps V2 market proxy target names carry this prefix.
const PERPS_V2_PROXY_PREFIX: &str = "PerpsV2Proxy";

/// One deployed contract target from the deployment document.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[cfg_attr(feature = "display", derive(tabled::Tabled))]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTarget {
    pub name: String,
    pub address: Address,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    #[cfg_attr(feature = "display", tabled(skip))]
    pub txn: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    #[cfg_attr(feature = "display", tabled(skip))]
    pub constructor_args: Vec<serde_json::Value>,
}

/// Parsed Synthetix deployment document.
///
/// Only the `targets` section is read; the Perps V2 market proxies in it
/// are the entry points for per-market detail queries.
#[derive(Clone, Debug, Deserialize)]
pub struct Deployment {
    targets: BTreeMap<String, DeploymentTarget>,
}

impl Deployment {
    pub fn from_json(document: &str) -> Result<Self, MarketDataError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Fetch and parse the live deployment document.
    pub async fn fetch(url: &str) -> Result<Self, MarketDataError> {
        Self::from_json(&fetch_document(url).await?)
    }

    pub fn targets(&self) -> &BTreeMap<String, DeploymentTarget> { &self.targets }

    /// Perps V2 market proxy targets, in document key order.
    pub fn perps_v2_proxies(&self) -> impl Iterator<Item = &DeploymentTarget> {
        self.targets
            .iter()
            .filter(|(key, _)| key.starts_with(PERPS_V2_PROXY_PREFIX))
            .map(|(_, target)| target)
    }

    /// Addresses of all Perps V2 market proxies.
    pub fn perps_v2_addresses(&self) -> Vec<Address> {
        self.perps_v2_proxies().map(|target| target.address).collect()
    }
}

/// Fetch the raw deployment document.
///
/// Persisting it is left to the caller.
pub async fn fetch_document(url: &str) -> Result<String, MarketDataError> {
    Ok(reqwest::get(url).await?.error_for_status()?.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "targets": {
            "PerpsV2ProxyETHPERP": {
                "name": "PerpsV2ProxyETHPERP",
                "address": "0x2B3bb4c683BFc5239B029131EEf3B1d214478d93",
                "source": "ProxyPerpsV2",
                "timestamp": "2023-03-15",
                "txn": "",
                "network": "mainnet-ovm"
            },
            "PerpsV2ProxyBTCPERP": {
                "name": "PerpsV2ProxyBTCPERP",
                "address": "0x59b007E9ea8F89b069c43F8f45834d30853e3699",
                "source": "ProxyPerpsV2",
                "timestamp": "2023-03-15",
                "txn": "",
                "network": "mainnet-ovm"
            },
            "ProxyERC20": {
                "name": "ProxyERC20",
                "address": "0x8700dAec35aF8Ff88c16BdF0418774CB3D7599B4",
                "source": "ProxyERC20",
                "timestamp": "2019-01-01",
                "txn": "",
                "network": "mainnet-ovm"
            }
        }
    }"#;

    #[test]
    fn filters_perps_v2_proxies() {
        let deployment = Deployment::from_json(DOCUMENT).unwrap();
        assert_eq!(deployment.targets().len(), 3);

        let proxies: Vec<_> = deployment.perps_v2_proxies().collect();
        assert_eq!(proxies.len(), 2);
        // BTreeMap iteration: BTC sorts before ETH.
        assert_eq!(proxies[0].name, "PerpsV2ProxyBTCPERP");
        assert_eq!(proxies[1].name, "PerpsV2ProxyETHPERP");
        assert_eq!(deployment.perps_v2_addresses().len(), 2);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(matches!(
            Deployment::from_json("{}").unwrap_err(),
            MarketDataError::Document(_)
        ));
    }
}
