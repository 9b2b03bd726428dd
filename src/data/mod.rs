pub mod backend;
pub mod chains;
pub mod contract;
pub mod provider;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, U256};
use alloy::signers::local::PrivateKeySigner;
use tokio::sync::{mpsc, RwLock};
use tracing::{info, warn};

use crate::data::backend::StorageBackend;
use crate::data::provider::EthProvider;
use crate::data::types::{ChainConfig, ReadError, WriteError};
use crate::events::AppEvent;

/// Where and how the service reaches the contract.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub network: ChainConfig,
    pub contract: Address,
    pub receipt_poll_interval: Duration,
}

/// Runs chain operations in background tasks and reports results as [`AppEvent`]s.
pub struct DataService {
    settings: ServiceSettings,
    backend: RwLock<Option<Arc<dyn StorageBackend>>>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl DataService {
    pub fn new(settings: ServiceSettings, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            settings,
            backend: RwLock::new(None),
            event_tx,
        }
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    async fn backend(&self) -> Option<Arc<dyn StorageBackend>> {
        self.backend.read().await.clone()
    }

    /// Install a connected backend and announce the connection.
    pub async fn attach(&self, backend: Arc<dyn StorageBackend>) {
        let account = backend.account();
        let chain_id = backend.chain_id();
        *self.backend.write().await = Some(backend);

        let _ = self.event_tx.send(AppEvent::WalletConnected { account, chain_id });

        let expected = &self.settings.network;
        if chain_id != expected.chain_id {
            warn!(chain_id, expected = expected.chain_id, "wallet is on an unexpected chain");
            let _ = self.event_tx.send(AppEvent::Error(format!(
                "Wallet is on chain {chain_id}, expected {} ({})",
                expected.name, expected.chain_id
            )));
        }
    }

    /// Connect a private-key wallet to the configured node.
    pub fn connect_wallet(self: &Arc<Self>, signer: PrivateKeySigner) {
        let service = Arc::clone(self);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let settings = &service.settings;
            match EthProvider::connect(
                &settings.network.rpc_url,
                settings.contract,
                signer,
                settings.receipt_poll_interval,
            )
            .await
            {
                Ok(provider) => service.attach(Arc::new(provider)).await,
                Err(e) => {
                    warn!(error = %e, "wallet connection failed");
                    let _ = tx.send(AppEvent::WalletError(format!(
                        "Failed to connect to {}: {e}",
                        settings.network.rpc_url
                    )));
                }
            }
        });
    }

    pub fn disconnect_wallet(self: &Arc<Self>) {
        let service = Arc::clone(self);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            if service.backend.write().await.take().is_some() {
                info!("wallet disconnected");
            }
            let _ = tx.send(AppEvent::WalletDisconnected);
        });
    }

    /// Read the stored number and send it as an event tagged with `generation`.
    pub fn fetch_number(self: &Arc<Self>, generation: u64) {
        let service = Arc::clone(self);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let result = match service.backend().await {
                Some(backend) => backend.read_number().await,
                None => Err(ReadError::NotConnected),
            };
            match result {
                Ok(value) => {
                    info!(%value, generation, "stored number loaded");
                    let _ = tx.send(AppEvent::NumberLoaded { generation, value });
                }
                Err(error) => {
                    warn!(%error, generation, "failed to read stored number");
                    let _ = tx.send(AppEvent::ReadFailed { generation, error });
                }
            }
        });
    }

    /// Run one write cycle: send `setMyNumber(value)`, then wait for its receipt.
    /// The refresh read is left to the receiver of `TxConfirmed`.
    pub fn submit_number(self: &Arc<Self>, value: U256) {
        let service = Arc::clone(self);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let Some(backend) = service.backend().await else {
                let _ = tx.send(AppEvent::TxFailed(WriteError::NotConnected));
                return;
            };

            let hash = match backend.send_set_number(value).await {
                Ok(hash) => hash,
                Err(e) => {
                    warn!(error = %e, %value, "transaction was not submitted");
                    let _ = tx.send(AppEvent::TxFailed(e));
                    return;
                }
            };
            info!(%hash, %value, "transaction submitted");
            let _ = tx.send(AppEvent::TxSubmitted(hash));
            let _ = tx.send(AppEvent::TxConfirming(hash));

            match backend.wait_for_receipt(hash).await {
                Ok(receipt) if receipt.success => {
                    info!(%hash, block = ?receipt.block_number, "transaction confirmed");
                    let _ = tx.send(AppEvent::TxConfirmed(Box::new(receipt)));
                }
                Ok(_) => {
                    warn!(%hash, "transaction reverted");
                    let _ = tx.send(AppEvent::TxFailed(WriteError::Reverted(hash)));
                }
                Err(e) => {
                    warn!(%hash, error = %e, "failed to confirm transaction");
                    let _ = tx.send(AppEvent::TxFailed(e));
                }
            }
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use alloy::primitives::TxHash;
    use futures::future::BoxFuture;

    use super::*;
    use crate::data::chains::get_chain_config;
    use crate::data::types::{NumberChange, ReceiptSummary};

    /// In-memory stand-in for a wallet + node.
    pub(crate) struct MockBackend {
        pub stored: Mutex<U256>,
        pub read_error: Mutex<Option<String>>,
        pub reject_with: Mutex<Option<String>>,
        pub revert: Mutex<bool>,
        pub writes: Mutex<Vec<U256>>,
        pub reads: Mutex<usize>,
        pub receipt_waits: Mutex<usize>,
    }

    impl MockBackend {
        pub(crate) const ACCOUNT: Address = Address::repeat_byte(0xaa);

        pub(crate) fn new(stored: u64) -> Self {
            Self {
                stored: Mutex::new(U256::from(stored)),
                read_error: Mutex::new(None),
                reject_with: Mutex::new(None),
                revert: Mutex::new(false),
                writes: Mutex::new(Vec::new()),
                reads: Mutex::new(0),
                receipt_waits: Mutex::new(0),
            }
        }

        pub(crate) fn writes(&self) -> Vec<U256> {
            self.writes.lock().unwrap().clone()
        }

        pub(crate) fn reads(&self) -> usize {
            *self.reads.lock().unwrap()
        }

        fn hash_for(value: U256) -> TxHash {
            TxHash::from(value.to_be_bytes::<32>())
        }
    }

    impl StorageBackend for MockBackend {
        fn account(&self) -> Address {
            Self::ACCOUNT
        }

        fn chain_id(&self) -> u64 {
            31337
        }

        fn read_number(&self) -> BoxFuture<'_, Result<U256, ReadError>> {
            Box::pin(async move {
                *self.reads.lock().unwrap() += 1;
                match self.read_error.lock().unwrap().clone() {
                    Some(msg) => Err(ReadError::Rpc(msg)),
                    None => Ok(*self.stored.lock().unwrap()),
                }
            })
        }

        fn send_set_number(&self, value: U256) -> BoxFuture<'_, Result<TxHash, WriteError>> {
            Box::pin(async move {
                self.writes.lock().unwrap().push(value);
                if let Some(msg) = self.reject_with.lock().unwrap().clone() {
                    return Err(WriteError::Rejected(msg));
                }
                Ok(Self::hash_for(value))
            })
        }

        fn wait_for_receipt(
            &self,
            hash: TxHash,
        ) -> BoxFuture<'_, Result<ReceiptSummary, WriteError>> {
            Box::pin(async move {
                *self.receipt_waits.lock().unwrap() += 1;
                let success = !*self.revert.lock().unwrap();
                let value = U256::from_be_bytes(hash.0);
                let change = success.then(|| {
                    *self.stored.lock().unwrap() = value;
                    NumberChange {
                        by: Self::ACCOUNT,
                        number: value,
                    }
                });
                Ok(ReceiptSummary {
                    hash,
                    block_number: Some(7),
                    gas_used: 26_000,
                    success,
                    change,
                })
            })
        }
    }

    pub(crate) fn settings() -> ServiceSettings {
        ServiceSettings {
            network: get_chain_config("hardhat").unwrap(),
            contract: crate::data::contract::CONTRACT_ADDRESS,
            receipt_poll_interval: Duration::from_millis(10),
        }
    }

    async fn service_with(
        backend: Arc<MockBackend>,
    ) -> (Arc<DataService>, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let service = Arc::new(DataService::new(settings(), tx));
        service.attach(backend).await;
        assert!(matches!(rx.try_recv(), Ok(AppEvent::WalletConnected { .. })));
        (service, rx)
    }

    #[tokio::test]
    async fn test_attach_announces_account() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let service = DataService::new(settings(), tx);
        service.attach(Arc::new(MockBackend::new(0))).await;
        match rx.recv().await {
            Some(AppEvent::WalletConnected { account, chain_id }) => {
                assert_eq!(account, MockBackend::ACCOUNT);
                assert_eq!(chain_id, 31337);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_attach_warns_on_chain_mismatch() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut settings = settings();
        settings.network = get_chain_config("sepolia").unwrap();
        let service = DataService::new(settings, tx);
        service.attach(Arc::new(MockBackend::new(0))).await;
        assert!(matches!(rx.recv().await, Some(AppEvent::WalletConnected { .. })));
        assert!(matches!(rx.recv().await, Some(AppEvent::Error(_))));
    }

    #[tokio::test]
    async fn test_fetch_number() {
        let backend = Arc::new(MockBackend::new(7));
        let (service, mut rx) = service_with(Arc::clone(&backend)).await;
        service.fetch_number(3);
        match rx.recv().await {
            Some(AppEvent::NumberLoaded { generation, value }) => {
                assert_eq!(generation, 3);
                assert_eq!(value, U256::from(7));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(backend.reads(), 1);
    }

    #[tokio::test]
    async fn test_fetch_number_failure() {
        let backend = Arc::new(MockBackend::new(7));
        *backend.read_error.lock().unwrap() = Some("wrong network".to_string());
        let (service, mut rx) = service_with(Arc::clone(&backend)).await;
        service.fetch_number(1);
        match rx.recv().await {
            Some(AppEvent::ReadFailed {
                generation: 1,
                error: ReadError::Rpc(msg),
            }) => assert_eq!(msg, "wrong network"),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(backend.writes().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_without_wallet() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let service = Arc::new(DataService::new(settings(), tx));
        service.fetch_number(0);
        assert!(matches!(
            rx.recv().await,
            Some(AppEvent::ReadFailed {
                error: ReadError::NotConnected,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_submit_confirms_in_order() {
        let backend = Arc::new(MockBackend::new(0));
        let (service, mut rx) = service_with(Arc::clone(&backend)).await;
        service.submit_number(U256::from(42));

        let hash = match rx.recv().await {
            Some(AppEvent::TxSubmitted(hash)) => hash,
            other => panic!("unexpected event: {other:?}"),
        };
        assert!(matches!(rx.recv().await, Some(AppEvent::TxConfirming(h)) if h == hash));
        match rx.recv().await {
            Some(AppEvent::TxConfirmed(receipt)) => {
                assert_eq!(receipt.hash, hash);
                assert_eq!(receipt.change.map(|c| c.number), Some(U256::from(42)));
            }
            other => panic!("unexpected event: {other:?}"),
        }

        assert_eq!(backend.writes(), vec![U256::from(42)]);
        assert_eq!(*backend.receipt_waits.lock().unwrap(), 1);
        // the refresh read belongs to the confirmation handler
        assert_eq!(backend.reads(), 0);
    }

    #[tokio::test]
    async fn test_submit_rejected_skips_receipt_wait() {
        let backend = Arc::new(MockBackend::new(0));
        *backend.reject_with.lock().unwrap() = Some("user rejected".to_string());
        let (service, mut rx) = service_with(Arc::clone(&backend)).await;
        service.submit_number(U256::from(5));

        match rx.recv().await {
            Some(AppEvent::TxFailed(WriteError::Rejected(msg))) => assert_eq!(msg, "user rejected"),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(*backend.receipt_waits.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_submit_reverted() {
        let backend = Arc::new(MockBackend::new(0));
        *backend.revert.lock().unwrap() = true;
        let (service, mut rx) = service_with(Arc::clone(&backend)).await;
        service.submit_number(U256::from(5));

        assert!(matches!(rx.recv().await, Some(AppEvent::TxSubmitted(_))));
        assert!(matches!(rx.recv().await, Some(AppEvent::TxConfirming(_))));
        assert!(matches!(
            rx.recv().await,
            Some(AppEvent::TxFailed(WriteError::Reverted(_)))
        ));
        assert_eq!(*backend.stored.lock().unwrap(), U256::ZERO);
    }

    #[tokio::test]
    async fn test_disconnect_drops_backend() {
        let backend = Arc::new(MockBackend::new(3));
        let (service, mut rx) = service_with(Arc::clone(&backend)).await;
        service.disconnect_wallet();
        assert!(matches!(rx.recv().await, Some(AppEvent::WalletDisconnected)));

        service.submit_number(U256::from(1));
        assert!(matches!(
            rx.recv().await,
            Some(AppEvent::TxFailed(WriteError::NotConnected))
        ));
        assert!(backend.writes().is_empty());
    }

    #[tokio::test]
    async fn test_reattach_after_disconnect_uses_new_backend() {
        let first = Arc::new(MockBackend::new(1));
        let (service, mut rx) = service_with(Arc::clone(&first)).await;
        service.disconnect_wallet();
        assert!(matches!(rx.recv().await, Some(AppEvent::WalletDisconnected)));

        let second = Arc::new(MockBackend::new(2));
        service.attach(second.clone()).await;
        assert!(matches!(rx.recv().await, Some(AppEvent::WalletConnected { .. })));
        service.fetch_number(1);
        assert!(matches!(
            rx.recv().await,
            Some(AppEvent::NumberLoaded { value, .. }) if value == U256::from(2)
        ));
        assert_eq!(first.reads(), 0);
        assert_eq!(second.reads(), 1);
    }
}
