//! Native logic backing implementation code in the in-memory backend.
//!
//! Implementation code is opaque to the registry. To make deployed artifacts callable, the
//! in-memory backend resolves the hash of an account's code to a [`ContractLogic`], the same
//! way a precompile map resolves an address to a native function.

use std::{fmt, sync::Arc};

use alloy_primitives::{keccak256, map::HashMap, Address, Bytes, B256, U256};
use auto_impl::auto_impl;

/// Persistent storage of an account.
pub type Storage = HashMap<U256, U256>;

/// Outcome of executing a call: the return data, or the revert data.
pub type CallResult = Result<Bytes, Bytes>;

/// The environment a call executes in.
///
/// `address` owns `storage`. For a call forwarded by a wrapper, `address` is the wrapper and
/// `code_address` is the implementation whose logic runs.
#[derive(Debug)]
pub struct CallContext<'a> {
    /// The account whose storage is in use.
    pub address: Address,
    /// The account whose code is executing.
    pub code_address: Address,
    storage: &'a mut Storage,
}

impl<'a> CallContext<'a> {
    /// Creates a context executing `code_address`'s code on `address`'s storage.
    pub fn new(address: Address, code_address: Address, storage: &'a mut Storage) -> Self {
        Self { address, code_address, storage }
    }

    /// Whether the call is executing through a wrapper.
    pub fn is_delegated(&self) -> bool {
        self.address != self.code_address
    }

    /// Reads a storage slot. Unset slots read as zero.
    pub fn sload(&self, slot: U256) -> U256 {
        self.storage.get(&slot).copied().unwrap_or_default()
    }

    /// Writes a storage slot. Writing zero clears the slot.
    pub fn sstore(&mut self, slot: U256, value: U256) {
        if value.is_zero() {
            self.storage.remove(&slot);
        } else {
            self.storage.insert(slot, value);
        }
    }
}

/// Native logic executed for calls into a piece of implementation code.
#[auto_impl(&, Box, Arc)]
pub trait ContractLogic: fmt::Debug + Send + Sync {
    /// Executes `input` in `ctx`.
    fn execute(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> CallResult;
}

/// Maps code hashes to the logic that executes them.
#[derive(Clone, Debug, Default)]
pub struct LogicTable {
    entries: HashMap<B256, Arc<dyn ContractLogic>>,
}

impl LogicTable {
    /// Registers `logic` for `code`. Returns the code hash it is registered under.
    pub fn insert(&mut self, code: &[u8], logic: impl ContractLogic + 'static) -> B256 {
        let code_hash = keccak256(code);
        self.entries.insert(code_hash, Arc::new(logic));
        code_hash
    }

    /// Returns the logic registered for `code_hash`.
    pub fn get(&self, code_hash: &B256) -> Option<&dyn ContractLogic> {
        self.entries.get(code_hash).map(|logic| logic.as_ref())
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no logic is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
