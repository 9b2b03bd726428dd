use alloy::primitives::Address;

use crate::events::AppEvent;

/// Whether a wallet is connected. Only wallet events move it; the connect
/// prompt owns any in-between "connecting" display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionGate {
    #[default]
    NotConnected,
    Connected { account: Address, chain_id: u64 },
}

impl ConnectionGate {
    /// Apply a wallet event. Returns true if the gate changed state.
    pub fn apply(&mut self, event: &AppEvent) -> bool {
        let next = match event {
            AppEvent::WalletConnected { account, chain_id } => ConnectionGate::Connected {
                account: *account,
                chain_id: *chain_id,
            },
            AppEvent::WalletDisconnected => ConnectionGate::NotConnected,
            _ => return false,
        };
        let changed = *self != next;
        *self = next;
        changed
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionGate::Connected { .. })
    }

    pub fn account(&self) -> Option<Address> {
        match self {
            ConnectionGate::Connected { account, .. } => Some(*account),
            ConnectionGate::NotConnected => None,
        }
    }
}
