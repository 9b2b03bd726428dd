use alloy::primitives::{Address, TxHash, U256};

#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
}

/// Decoded `NumberChanged(address indexed by, uint256 number)` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberChange {
    pub by: Address,
    pub number: U256,
}

/// The parts of a transaction receipt the panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptSummary {
    pub hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub success: bool,
    pub change: Option<NumberChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    #[error("wallet not connected")]
    NotConnected,
    #[error("{0}")]
    Rpc(String),
}

/// Failure of a write cycle. A rejection happens before a transaction hash
/// exists; everything else refers to a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    #[error("wallet not connected")]
    NotConnected,
    #[error("rejected before submission: {0}")]
    Rejected(String),
    #[error("transaction {0} reverted on-chain")]
    Reverted(TxHash),
    #[error("could not confirm transaction {hash}: {message}")]
    Receipt { hash: TxHash, message: String },
}

impl WriteError {
    /// Hash of the submitted transaction, if the failure happened after submission.
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            WriteError::Reverted(hash) | WriteError::Receipt { hash, .. } => Some(*hash),
            WriteError::NotConnected | WriteError::Rejected(_) => None,
        }
    }
}
