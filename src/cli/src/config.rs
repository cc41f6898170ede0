//! Configuration for the ledger client.

use anyhow::Result;
use ethers::types::U256;
use ledger_contract::TxSettings;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the RPC endpoint.
pub const ENV_RPC_URL: &str = "LEDGERCTL_RPC_URL";
/// Environment variable overriding the contract address.
pub const ENV_CONTRACT: &str = "LEDGERCTL_CONTRACT";
/// Environment variable holding a hex private key.
pub const ENV_PRIVATE_KEY: &str = "LEDGERCTL_PRIVATE_KEY";
/// Environment variable holding the keystore password.
pub const ENV_KEYSTORE_PASSWORD: &str = "LEDGERCTL_KEYSTORE_PASSWORD";

/// Configuration for the ledger client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// The JSON-RPC endpoint to connect to
    pub rpc_url: String,
    /// Address of the deployed ledger contract
    pub contract_address: String,
    /// Chain id used when signing
    pub chain_id: u64,
    /// The gas price to use for transactions
    pub gas_price: Option<u64>,
    /// The gas limit to use for transactions
    pub gas_limit: Option<u64>,
    /// Send legacy (pre-EIP-1559) transactions
    pub legacy_transactions: bool,
    /// Receipt polls before a transaction times out
    pub poll_attempts: u32,
    /// Milliseconds between receipt polls
    pub poll_interval_ms: u64,
    /// Milliseconds between event polls
    pub observer_poll_interval_ms: u64,
    /// Run revert diagnostics for every rejected command, not only pause
    pub diagnose_all_rejections: bool,
    /// Encrypted JSON keystore holding the signing key
    pub keystore: Option<PathBuf>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            contract_address: String::new(),
            chain_id: 1337,
            gas_price: Some(0),
            gas_limit: Some(430_000),
            legacy_transactions: true,
            poll_attempts: 40,
            poll_interval_ms: 1000,
            observer_poll_interval_ms: 2000,
            diagnose_all_rejections: false,
            keystore: None,
        }
    }
}

impl LedgerConfig {
    /// Loads configuration from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Saves configuration to a file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Default location of the configuration file.
    pub fn default_path() -> PathBuf {
        let mut dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        dir.push("ledgerctl");
        dir.push("config.json");
        dir
    }

    /// Applies overrides from the environment, given as a lookup function.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_RPC_URL).filter(|v| !v.is_empty()) {
            self.rpc_url = url;
        }
        if let Some(address) = lookup(ENV_CONTRACT).filter(|v| !v.is_empty()) {
            self.contract_address = address;
        }
    }

    /// Checks the settings needed to start a session.
    pub fn validate(&self) -> Result<(), String> {
        if self.rpc_url.trim().is_empty() {
            return Err("rpc_url is empty".to_string());
        }
        if self.contract_address.trim().is_empty() {
            return Err(format!(
                "contract_address is not set (use --contract, {} or the config file)",
                ENV_CONTRACT
            ));
        }
        if self.poll_attempts == 0 || self.poll_interval_ms == 0 {
            return Err("poll_attempts and poll_interval_ms must be positive".to_string());
        }
        Ok(())
    }

    /// Transaction settings for the contract gateway.
    pub fn tx_settings(&self) -> TxSettings {
        TxSettings {
            gas_limit: self.gas_limit.map(U256::from),
            gas_price: self.gas_price.map(U256::from),
            legacy: self.legacy_transactions,
            poll_attempts: self.poll_attempts,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    pub fn observer_interval(&self) -> Duration {
        Duration::from_millis(self.observer_poll_interval_ms)
    }
}
