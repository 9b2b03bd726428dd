use std::sync::OnceLock;

use alloy::json_abi::JsonAbi;
use alloy::primitives::{address, Address, Log};
use alloy::sol;
use alloy::sol_types::SolEvent;

use crate::data::types::NumberChange;

/// Address the SimpleStorage contract is deployed at.
pub const CONTRACT_ADDRESS: Address = address!("3F0586F61C8716cA0Ad3A0278c22d45F4567fa7B");

sol! {
    #[sol(rpc)]
    contract SimpleStorage {
        event NumberChanged(address indexed by, uint256 number);

        function getMyNumber() external view returns (uint256);
        function setMyNumber(uint256 _myNumber) external;
    }
}

static SIMPLE_STORAGE_ABI: OnceLock<JsonAbi> = OnceLock::new();

/// The JSON interface descriptor shipped alongside the contract.
pub fn abi() -> &'static JsonAbi {
    SIMPLE_STORAGE_ABI.get_or_init(|| {
        serde_json::from_str(include_str!("../../abis/SimpleStorage.json"))
            .expect("built-in SimpleStorage ABI should be valid")
    })
}

/// Human readable signatures of every function and event in the descriptor.
pub fn interface_signatures() -> Vec<String> {
    let abi = abi();
    let functions = abi.functions().map(|f| {
        let returns: Vec<String> = f.outputs.iter().map(|p| p.ty.clone()).collect();
        if returns.is_empty() {
            format!("function {}", f.signature())
        } else {
            format!("function {} returns ({})", f.signature(), returns.join(","))
        }
    });
    let events = abi.events().map(|e| format!("event {}", e.signature()));
    functions.chain(events).collect()
}

/// Decode a `NumberChanged` log emitted by `contract`, ignoring anything else.
pub fn decode_number_changed(contract: Address, log: &Log) -> Option<NumberChange> {
    if log.address != contract {
        return None;
    }
    let decoded = SimpleStorage::NumberChanged::decode_log(log, true).ok()?;
    Some(NumberChange {
        by: decoded.data.by,
        number: decoded.data.number,
    })
}
