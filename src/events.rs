use alloy::primitives::{Address, TxHash, U256};
use alloy::signers::local::PrivateKeySigner;

use crate::data::types::{ReadError, ReceiptSummary, WriteError};

/// Events flowing into the main app loop, from background data tasks and
/// from components asking for work to be done.
#[derive(Debug)]
pub enum AppEvent {
    // Wallet
    ConnectWallet(Box<PrivateKeySigner>),
    DisconnectWallet,
    WalletConnected { account: Address, chain_id: u64 },
    WalletDisconnected,
    WalletError(String),

    // Read path. Each read carries the generation it was issued for, so a
    // result that has been superseded can be told apart from the current one.
    RefreshNumber(u64),
    NumberLoaded { generation: u64, value: U256 },
    ReadFailed { generation: u64, error: ReadError },

    // Write path
    SubmitNumber(U256),
    TxSubmitted(TxHash),
    TxConfirming(TxHash),
    TxConfirmed(Box<ReceiptSummary>),
    TxFailed(WriteError),

    // Status
    Error(String),
}
