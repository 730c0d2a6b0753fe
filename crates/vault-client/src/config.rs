//! network, relayer and contract configuration

use serde::{Deserialize, Serialize};
use vault_codec::Address;

/// env var overriding the primary rpc endpoint
pub const ENV_RPC_URL: &str = "VAULT_TRADE_RPC_URL";
/// env var overriding the trading contract address
pub const ENV_CONTRACT_ADDRESS: &str = "VAULT_TRADE_CONTRACT_ADDRESS";
/// env var overriding the fhe relayer endpoint
pub const ENV_FHE_URL: &str = "VAULT_TRADE_FHE_URL";

/// FantasyVaultTradeV2 on sepolia
pub const DEFAULT_CONTRACT_ADDRESS: Address = Address([
    0xb4, 0x20, 0xee, 0xcd, 0xa2, 0x21, 0xe7, 0xbb, 0xbd, 0xea, 0x43, 0x83, 0xcf, 0xef, 0x5e, 0xef,
    0x68, 0xc2, 0xdd, 0xf3,
]);

/// evm network settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// network name
    pub name: String,
    pub chain_id: u64,
    /// primary json-rpc endpoint
    pub rpc_url: String,
    /// public fallback endpoints
    pub fallback_rpc_urls: Vec<String>,
    /// block explorer base url
    pub explorer_url: String,
    pub testnet: bool,
}

impl NetworkConfig {
    /// ethereum sepolia testnet
    pub fn sepolia() -> Self {
        Self {
            name: "sepolia".into(),
            chain_id: 11_155_111,
            rpc_url: "https://ethereum-sepolia-rpc.publicnode.com".into(),
            fallback_rpc_urls: vec!["https://1rpc.io/sepolia".into()],
            explorer_url: "https://sepolia.etherscan.io".into(),
            testnet: true,
        }
    }

    /// explorer link for a transaction hash
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url, tx_hash)
    }
}

/// fhe relayer settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FheConfig {
    /// relayer / gateway endpoint
    pub relayer_url: String,
    /// application id sent to the relayer
    pub app_id: String,
}

impl Default for FheConfig {
    fn default() -> Self {
        Self {
            relayer_url: "https://api.zama.ai".into(),
            app_id: "fantasy-vault-trade".into(),
        }
    }
}

/// client configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub network: NetworkConfig,
    pub fhe: FheConfig,
    pub contract_address: Address,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::sepolia(),
            fhe: FheConfig::default(),
            contract_address: DEFAULT_CONTRACT_ADDRESS,
        }
    }
}

impl ClientConfig {
    /// defaults with environment overrides applied
    pub fn from_env() -> vault_codec::Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// apply overrides from `lookup` (env-like key -> value)
    pub fn with_overrides<F>(mut self, lookup: F) -> vault_codec::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_RPC_URL).filter(|v| !v.is_empty()) {
            self.network.rpc_url = url;
        }
        if let Some(addr) = lookup(ENV_CONTRACT_ADDRESS).filter(|v| !v.is_empty()) {
            self.contract_address = addr.parse()?;
        }
        if let Some(url) = lookup(ENV_FHE_URL).filter(|v| !v.is_empty()) {
            self.fhe.relayer_url = url;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_is_sepolia() {
        let config = ClientConfig::default();
        assert_eq!(config.network.chain_id, 11_155_111);
        assert_eq!(
            config.contract_address,
            "0xb420eecda221E7BbbdEa4383CFef5eef68c2ddf3".parse().unwrap()
        );
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_RPC_URL, "http://localhost:8545"),
            (ENV_CONTRACT_ADDRESS, "0x0000000000000000000000000000000000000001"),
            (ENV_FHE_URL, ""),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::default()
            .with_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.network.rpc_url, "http://localhost:8545");
        assert_eq!(config.contract_address.0[19], 1);
        // empty values are ignored
        assert_eq!(config.fhe.relayer_url, "https://api.zama.ai");
    }

    #[test]
    fn test_bad_address_override() {
        let result = ClientConfig::default()
            .with_overrides(|k| (k == ENV_CONTRACT_ADDRESS).then(|| "nope".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ClientConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("0xb420eecda221e7bbbdea4383cfef5eef68c2ddf3"));
        let back: ClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_tx_url() {
        let net = NetworkConfig::sepolia();
        assert_eq!(net.tx_url("0xabc"), "https://sepolia.etherscan.io/tx/0xabc");
    }
}
