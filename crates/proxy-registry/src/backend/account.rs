//! Accounts of the in-memory backend.

use alloy_primitives::{keccak256, Address, Bytes, B256};

use super::{CallContext, CallResult, ContractLogic, Storage};
use crate::NamespaceKey;

/// What kind of artifact an account holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountKind {
    /// Code that executes in its own storage context.
    Implementation,
    /// A forwarding wrapper: calls execute the implementation's code on the wrapper's storage.
    Wrapper {
        /// The implementation calls are forwarded to
        implementation: Address,
    },
}

/// A deployed artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    /// The namespace key the account was deployed under.
    pub key: NamespaceKey,
    /// The code the account was constructed from.
    pub code: Bytes,
    /// Hash of `code`.
    pub code_hash: B256,
    /// What the account is.
    pub kind: AccountKind,
    /// Persistent storage.
    pub storage: Storage,
}

impl Account {
    /// Creates an implementation account holding `code`.
    pub fn implementation(key: NamespaceKey, code: Bytes) -> Self {
        let code_hash = keccak256(&code);
        Self { key, code, code_hash, kind: AccountKind::Implementation, storage: Storage::default() }
    }

    /// Creates a wrapper account forwarding to `implementation`, with empty storage.
    pub fn wrapper(key: NamespaceKey, code: Bytes, implementation: Address) -> Self {
        let code_hash = keccak256(&code);
        Self {
            key,
            code,
            code_hash,
            kind: AccountKind::Wrapper { implementation },
            storage: Storage::default(),
        }
    }

    /// The implementation a wrapper forwards to, `None` for any other account.
    pub const fn implementation_address(&self) -> Option<Address> {
        match self.kind {
            AccountKind::Wrapper { implementation } => Some(implementation),
            AccountKind::Implementation => None,
        }
    }

    /// Executes `logic` as this account's own code.
    pub fn execute(
        &mut self,
        address: Address,
        logic: &dyn ContractLogic,
        input: &[u8],
    ) -> CallResult {
        let mut ctx = CallContext::new(address, address, &mut self.storage);
        logic.execute(&mut ctx, input)
    }

    /// Forwards a call to `implementation`'s `logic`, preserving this account's storage
    /// context.
    pub fn forward(
        &mut self,
        address: Address,
        implementation: Address,
        logic: &dyn ContractLogic,
        input: &[u8],
    ) -> CallResult {
        let mut ctx = CallContext::new(address, implementation, &mut self.storage);
        logic.execute(&mut ctx, input)
    }
}
