//! Command line and configuration file for the `kitpay` binary.
//!
//! The JSON file is optional. Without it the server binds to `HOST`/`PORT`
//! (default `0.0.0.0:8080`) and `kitpay pay` refuses to run because it has no
//! wallet to pay with.
//!
//! ```json
//! {
//!   "port": 8080,
//!   "wallet": {
//!     "signer": "$BUYER_PRIVATE_KEY",
//!     "chains": { "eip155:56": { "rpc": [{ "http": "$BSC_RPC_URL" }] } }
//!   }
//! }
//! ```

use clap::{Parser, Subcommand};
use kitpay_evm::EvmWalletConfig;
use kitpay_types::chain::ChainId;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "kitpay")]
#[command(about = "Fixed-price crypto checkout for the Web3 Multi-Chain Integration Kit")]
pub struct CliArgs {
    /// Path to the JSON configuration file
    #[arg(long, short, env = "CONFIG", default_value = "config.json", global = true)]
    pub config: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the product catalog over HTTP
    Serve,
    /// Pay for the kit with the configured wallet
    Pay {
        /// Chain to pay on, e.g. `56` or `eip155:56`
        #[arg(long)]
        chain: ChainId,
        /// Token symbol, e.g. `BNB` or `USDT`
        #[arg(long)]
        token: String,
    },
    /// Print accepted chains, tokens and amounts
    Catalog,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "config_defaults::default_port")]
    port: u16,
    #[serde(default = "config_defaults::default_host")]
    host: IpAddr,
    #[serde(default)]
    wallet: Option<EvmWalletConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: config_defaults::default_port(),
            host: config_defaults::default_host(),
            wallet: None,
        }
    }
}

pub mod config_defaults {
    use std::env;
    use std::net::{IpAddr, Ipv4Addr};

    pub const DEFAULT_PORT: u16 = 8080;
    pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

    /// `$PORT`, else 8080.
    pub fn default_port() -> u16 {
        env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT)
    }

    /// `$HOST`, else `0.0.0.0`.
    pub fn default_host() -> IpAddr {
        env::var("HOST")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_HOST)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {0}: {1}")]
    FileRead(PathBuf, std::io::Error),
    #[error("Failed to parse config file: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("No wallet configured; add a \"wallet\" section to the config file")]
    MissingWallet,
}

impl Config {
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn host(&self) -> IpAddr {
        self.host
    }

    pub fn wallet(&self) -> Result<&EvmWalletConfig, ConfigError> {
        self.wallet.as_ref().ok_or(ConfigError::MissingWallet)
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_json(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::FileRead(path.to_path_buf(), e)),
        }
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }
}
