//! Configuration for the quote service
//!
//! Loaded from environment variables (and `.env`), or from a TOML file.
//! The RPC credential is optional at load time: it is only required when
//! the chain connection is first built.

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use crate::error::QuoteError;

const DEFAULT_NETWORK: &str = "mainnet";
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_WALLETS_FILE: &str = "./wallets/wallets.json";

/// Main configuration struct
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // ========== Network Settings ==========
    /// Infura project key (INFURA_API_KEY)
    pub infura_api_key: Option<String>,

    /// Infura network name, e.g. "mainnet" or "sepolia"
    pub network: String,

    /// Full RPC URL; overrides the Infura URL when set
    pub rpc_url: Option<String>,

    // ========== Server Settings ==========
    /// Address the HTTP API binds to
    pub listen_addr: String,

    /// JSON document holding the wallets
    pub wallets_file: String,
}

impl Config {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from any key lookup (environment, map in tests)
    pub fn from_vars<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            infura_api_key: non_empty("INFURA_API_KEY"),
            network: non_empty("ETHEREUM_NETWORK").unwrap_or_else(|| DEFAULT_NETWORK.to_string()),
            rpc_url: non_empty("RPC_URL"),
            listen_addr: non_empty("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            wallets_file: non_empty("WALLETS_FILE").unwrap_or_else(|| DEFAULT_WALLETS_FILE.to_string()),
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// RPC endpoint the chain connection should use
    pub fn endpoint_url(&self) -> Result<String, QuoteError> {
        if let Some(url) = &self.rpc_url {
            return Ok(url.clone());
        }

        match &self.infura_api_key {
            Some(key) => Ok(format!("https://{}.infura.io/v3/{}", self.network, key)),
            None => Err(QuoteError::Configuration(
                "INFURA_API_KEY is not defined in environment variables".to_string(),
            )),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.endpoint_url().is_ok()
    }

    pub fn listen_socket(&self) -> Result<SocketAddr> {
        self.listen_addr
            .parse()
            .map_err(|e| eyre::eyre!("Invalid LISTEN_ADDR {:?}: {}", self.listen_addr, e))
    }

    /// Validate configuration before serving
    pub fn validate(&self) -> Result<()> {
        if self.network.is_empty() {
            return Err(eyre::eyre!("ETHEREUM_NETWORK must not be empty"));
        }
        if let Some(key) = &self.infura_api_key {
            if key.contains("YOUR_API_KEY") {
                return Err(eyre::eyre!("Invalid INFURA_API_KEY - please set a real Infura project key"));
            }
        }
        self.listen_socket()?;
        if self.wallets_file.is_empty() {
            return Err(eyre::eyre!("WALLETS_FILE must not be empty"));
        }
        Ok(())
    }

    /// Endpoint with the credential masked, safe to print
    pub fn endpoint_display(&self) -> String {
        if let Some(url) = &self.rpc_url {
            return mask_endpoint(url);
        }
        match &self.infura_api_key {
            Some(_) => format!("https://{}.infura.io/v3/****", self.network),
            None => "NOT SET".to_string(),
        }
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("╔════════════════════════════════════════════════════════════╗");
        println!("║              SWAP QUOTER - CONFIGURATION                   ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ Network:           {:^40} ║", self.network);
        println!("║ RPC Endpoint:      {:^40} ║", self.endpoint_display());
        println!("║ Credentials:       {:^40} ║",
            if self.has_credentials() { "✓ Configured" } else { "✗ Not Set" }
        );
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ Listen Address:    {:^40} ║", self.listen_addr);
        println!("║ Wallets File:      {:^40} ║", self.wallets_file);
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            infura_api_key: None,
            network: DEFAULT_NETWORK.to_string(),
            rpc_url: None,
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            wallets_file: DEFAULT_WALLETS_FILE.to_string(),
        }
    }
}

/// Keep scheme and host only. Path, query and userinfo are where RPC
/// providers put API keys, so they are masked whatever their length.
fn mask_endpoint(url: &str) -> String {
    let (scheme, rest) = match url.split_once("://") {
        Some((scheme, rest)) => (format!("{}://", scheme), rest),
        None => (String::new(), url),
    };

    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..authority_end];
    let (userinfo, host) = match authority.rsplit_once('@') {
        Some((_, host)) => ("****@", host),
        None => ("", authority),
    };
    let tail = if authority_end < rest.len() { "/****" } else { "" };

    format!("{}{}{}{}", scheme, userinfo, host, tail)
}

// ============================================
// TESTS
// ============================================
