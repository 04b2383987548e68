//! A minimal storage contract for exercising deployed proxies.

use alloy_primitives::{hex, Bytes, U256};
use alloy_sol_types::{sol, SolInterface, SolValue};

use crate::{CallContext, CallResult, ContractLogic, InMemoryBackend};

sol! {
    /// A contract holding one value.
    interface IValueStore {
        function setValue(uint256 newValue) external;
        function value() external view returns (uint256);
    }
}

/// Code of the value store. Only its hash matters: the in-memory backend maps it to
/// [`ValueStore`].
pub const VALUE_STORE_CODE: &[u8] = &hex!("6080604052348015600f57600080fd5b5060043610603c5760003560e01c");

/// Native logic of [`IValueStore`], keeping the value in slot 0.
///
/// Any input that is not a call of the interface reverts with empty data.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueStore;

impl ValueStore {
    /// The storage slot holding the value.
    pub const SLOT: U256 = U256::ZERO;
}

impl ContractLogic for ValueStore {
    fn execute(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> CallResult {
        let call =
            IValueStore::IValueStoreCalls::abi_decode(input, true).map_err(|_| Bytes::new())?;
        match call {
            IValueStore::IValueStoreCalls::setValue(call) => {
                ctx.sstore(Self::SLOT, call.newValue);
                Ok(Bytes::new())
            }
            IValueStore::IValueStoreCalls::value(_) => Ok(ctx.sload(Self::SLOT).abi_encode().into()),
        }
    }
}

/// An in-memory backend that knows how to execute [`VALUE_STORE_CODE`].
pub fn value_store_backend() -> InMemoryBackend {
    InMemoryBackend::default().with_logic(VALUE_STORE_CODE, ValueStore)
}
