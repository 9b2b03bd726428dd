use std::time::Duration;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionReceipt;
use alloy::signers::local::PrivateKeySigner;
use color_eyre::eyre::Result;
use futures::future::BoxFuture;
use tracing::{debug, info, warn};

use crate::data::backend::StorageBackend;
use crate::data::contract::{decode_number_changed, SimpleStorage};
use crate::data::types::{ReadError, ReceiptSummary, WriteError};
use crate::utils;

/// Consecutive failed receipt lookups tolerated before the wait gives up.
const MAX_RECEIPT_ERRORS: u32 = 5;

/// Wallet-backed connection to a node, bound to one SimpleStorage deployment.
/// The provider is type-erased to avoid spelling out the filler stack type.
pub struct EthProvider {
    provider: DynProvider,
    contract: Address,
    account: Address,
    chain_id: u64,
    poll_interval: Duration,
}

impl EthProvider {
    /// Connect to a node via HTTP RPC, signing with `signer`.
    pub async fn connect(
        rpc_url: &str,
        contract: Address,
        signer: PrivateKeySigner,
        poll_interval: Duration,
    ) -> Result<Self> {
        let url = rpc_url.parse()?;
        let account = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .on_http(url);
        let chain_id = provider.get_chain_id().await?;
        info!(%account, chain_id, rpc_url, "wallet connected");
        Ok(Self::new(provider.erased(), contract, account, chain_id, poll_interval))
    }

    /// Wrap an already connected provider that signs for `account`.
    pub fn new(
        provider: DynProvider,
        contract: Address,
        account: Address,
        chain_id: u64,
        poll_interval: Duration,
    ) -> Self {
        Self {
            provider,
            contract,
            account,
            chain_id,
            poll_interval,
        }
    }

    /// Call `getMyNumber()` from the connected account.
    pub async fn get_my_number(&self) -> Result<U256> {
        let contract = SimpleStorage::new(self.contract, &self.provider);
        let number = contract.getMyNumber().from(self.account).call().await?._0;
        Ok(number)
    }

    /// Send `setMyNumber(value)` and return once the node accepted it.
    pub async fn set_my_number(&self, value: U256) -> Result<TxHash> {
        let contract = SimpleStorage::new(self.contract, &self.provider);
        let pending = contract.setMyNumber(value).from(self.account).send().await?;
        Ok(*pending.tx_hash())
    }

    /// Get a transaction receipt by transaction hash.
    pub async fn get_transaction_receipt(&self, hash: TxHash) -> Result<Option<TransactionReceipt>> {
        let receipt = self.provider.get_transaction_receipt(hash).await?;
        Ok(receipt)
    }

    /// Poll until the receipt for `hash` is available. Lookup errors are retried
    /// until `MAX_RECEIPT_ERRORS` of them happen in a row.
    pub async fn poll_receipt(&self, hash: TxHash) -> Result<TransactionReceipt> {
        let mut interval = tokio::time::interval(self.poll_interval);
        let mut errors = 0;
        loop {
            interval.tick().await;
            match self.get_transaction_receipt(hash).await {
                Ok(Some(receipt)) => return Ok(receipt),
                Ok(None) => {
                    errors = 0;
                    debug!(%hash, "receipt not available yet");
                }
                Err(e) => {
                    errors += 1;
                    if errors >= MAX_RECEIPT_ERRORS {
                        return Err(e);
                    }
                    warn!(%hash, error = %e, attempt = errors, "receipt lookup failed, retrying");
                }
            }
        }
    }

    fn summarize(&self, receipt: &TransactionReceipt) -> ReceiptSummary {
        let change = receipt
            .inner
            .logs()
            .iter()
            .find_map(|log| decode_number_changed(self.contract, &log.inner));
        ReceiptSummary {
            hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            success: receipt.status(),
            change,
        }
    }
}

impl StorageBackend for EthProvider {
    fn account(&self) -> Address {
        self.account
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn read_number(&self) -> BoxFuture<'_, Result<U256, ReadError>> {
        Box::pin(async move {
            self.get_my_number()
                .await
                .map_err(|e| ReadError::Rpc(utils::short_message(&e.to_string())))
        })
    }

    fn send_set_number(&self, value: U256) -> BoxFuture<'_, Result<TxHash, WriteError>> {
        Box::pin(async move {
            self.set_my_number(value)
                .await
                .map_err(|e| WriteError::Rejected(utils::short_message(&e.to_string())))
        })
    }

    fn wait_for_receipt(&self, hash: TxHash) -> BoxFuture<'_, Result<ReceiptSummary, WriteError>> {
        Box::pin(async move {
            let receipt = self.poll_receipt(hash).await.map_err(|e| WriteError::Receipt {
                hash,
                message: utils::short_message(&e.to_string()),
            })?;
            Ok(self.summarize(&receipt))
        })
    }
}

#[cfg(test)]
mod tests {
    use alloy::consensus::{Eip658Value, Receipt, ReceiptEnvelope, ReceiptWithBloom};
    use alloy::primitives::{Bloom, B256};
    use alloy::rpc::types::Log;
    use alloy::sol_types::SolEvent;
    use alloy::transports::mock::Asserter;

    use super::*;
    use crate::data::contract::CONTRACT_ADDRESS;

    const ACCOUNT: Address = Address::repeat_byte(0xaa);

    fn mocked(asserter: &Asserter) -> EthProvider {
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .on_mocked_client(asserter.clone())
            .erased();
        EthProvider::new(provider, CONTRACT_ADDRESS, ACCOUNT, 31337, Duration::from_millis(1))
    }

    fn receipt(hash: TxHash, success: bool, logs: Vec<Log>) -> TransactionReceipt {
        TransactionReceipt {
            inner: ReceiptEnvelope::Eip1559(ReceiptWithBloom {
                receipt: Receipt {
                    status: Eip658Value::Eip658(success),
                    cumulative_gas_used: 26_000,
                    logs,
                },
                logs_bloom: Bloom::ZERO,
            }),
            transaction_hash: hash,
            transaction_index: Some(0),
            block_hash: Some(B256::repeat_byte(0xbb)),
            block_number: Some(7),
            gas_used: 26_000,
            effective_gas_price: 1_000_000_000,
            blob_gas_used: None,
            blob_gas_price: None,
            from: ACCOUNT,
            to: Some(CONTRACT_ADDRESS),
            contract_address: None,
        }
    }

    fn number_changed(emitter: Address, number: u64) -> Log {
        let event = SimpleStorage::NumberChanged {
            by: ACCOUNT,
            number: U256::from(number),
        };
        Log {
            inner: alloy::primitives::Log {
                address: emitter,
                data: event.encode_log_data(),
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_read_number_decodes_call_result() {
        let asserter = Asserter::new();
        asserter.push_success(&B256::from(U256::from(7)));
        let provider = mocked(&asserter);
        assert_eq!(provider.read_number().await, Ok(U256::from(7)));
    }

    #[tokio::test]
    async fn test_read_number_error_is_rpc() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("execution reverted");
        let provider = mocked(&asserter);
        match provider.read_number().await {
            Err(ReadError::Rpc(msg)) => assert!(msg.contains("execution reverted"), "{msg}"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_returns_hash() {
        let hash = TxHash::repeat_byte(0x42);
        let asserter = Asserter::new();
        asserter.push_success(&hash);
        let provider = mocked(&asserter);
        assert_eq!(provider.send_set_number(U256::from(42)).await, Ok(hash));
    }

    #[tokio::test]
    async fn test_send_error_is_rejected() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("insufficient funds for gas");
        let provider = mocked(&asserter);
        match provider.send_set_number(U256::from(42)).await {
            Err(WriteError::Rejected(msg)) => assert!(msg.contains("insufficient funds"), "{msg}"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_wait_for_receipt_decodes_event() {
        let hash = TxHash::repeat_byte(0x42);
        let asserter = Asserter::new();
        // not mined on the first poll
        asserter.push_success(&serde_json::Value::Null);
        asserter.push_success(&receipt(hash, true, vec![number_changed(CONTRACT_ADDRESS, 42)]));
        let provider = mocked(&asserter);

        let summary = provider.wait_for_receipt(hash).await.unwrap();
        assert!(summary.success);
        assert_eq!(summary.hash, hash);
        assert_eq!(summary.block_number, Some(7));
        assert_eq!(summary.gas_used, 26_000);
        let change = summary.change.unwrap();
        assert_eq!(change.by, ACCOUNT);
        assert_eq!(change.number, U256::from(42));
    }

    #[tokio::test]
    async fn test_reverted_receipt_is_unsuccessful() {
        let hash = TxHash::repeat_byte(0x09);
        let asserter = Asserter::new();
        asserter.push_success(&receipt(hash, false, vec![]));
        let provider = mocked(&asserter);

        let summary = provider.wait_for_receipt(hash).await.unwrap();
        assert!(!summary.success);
        assert!(summary.change.is_none());
    }

    #[tokio::test]
    async fn test_receipt_wait_survives_transient_errors() {
        let hash = TxHash::repeat_byte(0x05);
        let asserter = Asserter::new();
        asserter.push_failure_msg("connection reset");
        asserter.push_failure_msg("connection reset");
        asserter.push_success(&receipt(hash, true, vec![]));
        let provider = mocked(&asserter);

        let summary = provider.wait_for_receipt(hash).await.unwrap();
        assert!(summary.success);
    }

    #[tokio::test]
    async fn test_receipt_wait_gives_up_after_repeated_errors() {
        let hash = TxHash::repeat_byte(0x05);
        let asserter = Asserter::new();
        for _ in 0..MAX_RECEIPT_ERRORS {
            asserter.push_failure_msg("node unavailable");
        }
        let provider = mocked(&asserter);

        match provider.wait_for_receipt(hash).await {
            Err(WriteError::Receipt { hash: h, message }) => {
                assert_eq!(h, hash);
                assert!(message.contains("node unavailable"), "{message}");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_summarize_ignores_foreign_logs() {
        let asserter = Asserter::new();
        let provider = mocked(&asserter);
        let hash = TxHash::repeat_byte(0x01);
        let foreign = number_changed(Address::repeat_byte(0x22), 5);
        let summary = provider.summarize(&receipt(hash, true, vec![foreign]));
        assert!(summary.change.is_none());
    }
}
