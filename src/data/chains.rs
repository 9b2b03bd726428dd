use crate::data::types::ChainConfig;

/// Get a chain configuration preset by name.
pub fn get_chain_config(name: &str) -> Option<ChainConfig> {
    match name.to_lowercase().as_str() {
        "hardhat" | "localhost" | "anvil" | "local" => Some(ChainConfig {
            name: "Hardhat local network".to_string(),
            chain_id: 31337,
            rpc_url: "http://127.0.0.1:8545".to_string(),
        }),
        "sepolia" => Some(ChainConfig {
            name: "Sepolia".to_string(),
            chain_id: 11155111,
            rpc_url: "https://ethereum-sepolia-rpc.publicnode.com".to_string(),
        }),
        "base-sepolia" | "base_sepolia" => Some(ChainConfig {
            name: "Base Sepolia".to_string(),
            chain_id: 84532,
            rpc_url: "https://sepolia.base.org".to_string(),
        }),
        "ethereum" | "eth" | "mainnet" => Some(ChainConfig {
            name: "Ethereum".to_string(),
            chain_id: 1,
            rpc_url: "https://eth.merkle.io".to_string(),
        }),
        _ => None,
    }
}

/// Return a list of all supported chain names.
pub fn supported_chains() -> Vec<&'static str> {
    vec!["hardhat", "sepolia", "base-sepolia", "ethereum"]
}

/// Human readable name for a chain id, falling back to the raw id.
pub fn chain_name(chain_id: u64) -> String {
    supported_chains()
        .into_iter()
        .filter_map(get_chain_config)
        .find(|c| c.chain_id == chain_id)
        .map(|c| c.name)
        .unwrap_or_else(|| format!("Chain {chain_id}"))
}
