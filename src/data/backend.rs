use alloy::primitives::{Address, TxHash, U256};
use futures::future::BoxFuture;

use crate::data::types::{ReadError, ReceiptSummary, WriteError};

/// A connected wallet able to talk to the SimpleStorage contract.
///
/// Implemented by [`crate::data::provider::EthProvider`] for real chains.
pub trait StorageBackend: Send + Sync {
    /// Account the wallet signs for.
    fn account(&self) -> Address;

    fn chain_id(&self) -> u64;

    /// `getMyNumber()` as seen by [`StorageBackend::account`].
    fn read_number(&self) -> BoxFuture<'_, Result<U256, ReadError>>;

    /// Sign and broadcast `setMyNumber(value)`, returning the transaction hash.
    fn send_set_number(&self, value: U256) -> BoxFuture<'_, Result<TxHash, WriteError>>;

    /// Block until the transaction has a receipt. No local timeout applies.
    fn wait_for_receipt(&self, hash: TxHash) -> BoxFuture<'_, Result<ReceiptSummary, WriteError>>;
}
