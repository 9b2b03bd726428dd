use std::path::PathBuf;

use alloy::primitives::Address;
use clap::Parser;

use crate::data::chains;
use crate::data::contract::CONTRACT_ADDRESS;
use crate::data::types::ChainConfig;

#[derive(Parser, Debug)]
#[command(name = "simple-storage-tui", about = "Terminal dApp for the SimpleStorage contract")]
pub struct Config {
    /// Chain preset (hardhat, sepolia, base-sepolia, ethereum)
    #[arg(long, default_value = "hardhat")]
    pub chain: String,

    /// RPC endpoint URL, overrides the preset's
    #[arg(short, long)]
    pub rpc_url: Option<String>,

    /// SimpleStorage contract address
    #[arg(long, default_value_t = CONTRACT_ADDRESS)]
    pub contract: Address,

    /// Private key to connect with on startup
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Tick rate in milliseconds for UI refresh
    #[arg(long, default_value = "100")]
    pub tick_rate_ms: u64,

    /// Interval in milliseconds between transaction receipt polls
    #[arg(long, default_value = "1000")]
    pub receipt_poll_ms: u64,

    /// Log file (defaults to the user cache directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Resolve the chain preset, applying the RPC URL override.
    /// Unknown presets fall back to the local Hardhat network.
    pub fn network(&self) -> ChainConfig {
        let mut network = chains::get_chain_config(&self.chain).unwrap_or_else(|| {
            eprintln!(
                "Unknown chain '{}', using hardhat (supported: {})",
                self.chain,
                chains::supported_chains().join(", ")
            );
            chains::get_chain_config("hardhat").unwrap_or(ChainConfig {
                name: "Hardhat local network".to_string(),
                chain_id: 31337,
                rpc_url: "http://127.0.0.1:8545".to_string(),
            })
        });
        if let Some(ref url) = self.rpc_url {
            network.rpc_url = url.clone();
        }
        network
    }
}
