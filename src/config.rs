//! SDK configuration
//!
//! Loaded from a TOML file or from the environment:
//!
//! ```toml
//! rpc_url = "https://api.mainnet-beta.solana.com"
//! ws_url = "wss://api.mainnet-beta.solana.com"
//! commitment = "confirmed"
//! default_buy_slippage_bps = 500
//! default_sell_slippage_bps = 9999
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;

use crate::constants::trade::trade::{DEFAULT_BUY_SLIPPAGE, DEFAULT_SELL_SLIPPAGE};
use crate::error::{ClientError, ClientResult};

const HELIUS_RPC_URL: &str = "https://mainnet.helius-rpc.com/?api-key=";
const HELIUS_WS_URL: &str = "wss://mainnet.helius-rpc.com/?api-key=";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConfig {
    /// HTTP JSON-RPC endpoint
    pub rpc_url: String,

    /// Websocket endpoint used for log subscriptions
    pub ws_url: String,

    /// One of `processed`, `confirmed`, `finalized`
    #[serde(default = "default_commitment")]
    pub commitment: String,

    #[serde(default = "default_buy_slippage_bps")]
    pub default_buy_slippage_bps: u64,

    #[serde(default = "default_sell_slippage_bps")]
    pub default_sell_slippage_bps: u64,
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

fn default_buy_slippage_bps() -> u64 {
    DEFAULT_BUY_SLIPPAGE
}

fn default_sell_slippage_bps() -> u64 {
    DEFAULT_SELL_SLIPPAGE
}

impl SdkConfig {
    pub fn new(rpc_url: impl Into<String>, ws_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            ws_url: ws_url.into(),
            commitment: default_commitment(),
            default_buy_slippage_bps: DEFAULT_BUY_SLIPPAGE,
            default_sell_slippage_bps: DEFAULT_SELL_SLIPPAGE,
        }
    }

    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ClientResult<Self> {
        let config: SdkConfig = toml::from_str(content)
            .map_err(|e| ClientError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Build the configuration from `RPC_URL` / `WS_URL`, falling back to
    /// Helius endpoints when only `HELIUS_API_KEY` is set
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok().filter(|value| !value.is_empty()))
    }

    fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let helius_key = lookup("HELIUS_API_KEY");
        let rpc_url = lookup("RPC_URL")
            .or_else(|| helius_key.as_ref().map(|key| format!("{}{}", HELIUS_RPC_URL, key)))
            .ok_or_else(|| {
                ClientError::Config("RPC_URL or HELIUS_API_KEY must be set".to_string())
            })?;
        let ws_url = lookup("WS_URL")
            .or_else(|| helius_key.as_ref().map(|key| format!("{}{}", HELIUS_WS_URL, key)))
            .or_else(|| derive_ws_url(&rpc_url))
            .ok_or_else(|| ClientError::Config("WS_URL could not be derived".to_string()))?;

        let mut config = Self::new(rpc_url, ws_url);
        if let Some(commitment) = lookup("COMMITMENT") {
            config.commitment = commitment;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ClientResult<()> {
        if !(self.rpc_url.starts_with("http://") || self.rpc_url.starts_with("https://")) {
            return Err(ClientError::Config(format!("rpc_url must be http(s): {:?}", self.rpc_url)));
        }
        if !(self.ws_url.starts_with("ws://") || self.ws_url.starts_with("wss://")) {
            return Err(ClientError::Config(format!("ws_url must be ws(s): {:?}", self.ws_url)));
        }
        self.commitment_config()?;
        Ok(())
    }

    pub fn commitment_config(&self) -> ClientResult<CommitmentConfig> {
        match self.commitment.as_str() {
            "processed" => Ok(CommitmentConfig::processed()),
            "confirmed" => Ok(CommitmentConfig::confirmed()),
            "finalized" => Ok(CommitmentConfig::finalized()),
            other => Err(ClientError::Config(format!("unknown commitment level {:?}", other))),
        }
    }
}

/// `https://host` -> `wss://host`
fn derive_ws_url(rpc_url: &str) -> Option<String> {
    if let Some(rest) = rpc_url.strip_prefix("https://") {
        Some(format!("wss://{}", rest))
    } else {
        rpc_url.strip_prefix("http://").map(|rest| format!("ws://{}", rest))
    }
}
