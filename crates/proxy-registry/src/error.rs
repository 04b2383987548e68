//! Error types of the registry and its backends.

use alloy_primitives::{Address, Bytes, B256};

use crate::NamespaceKey;

/// Errors surfaced by registry operations. None of them is recovered locally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The key was already consumed, or is held by a deployment in flight.
    #[error("namespace key {0} has already been used")]
    KeyAlreadyUsed(NamespaceKey),

    /// The deployment backend is missing or unreachable.
    #[error("deployment backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The one-time initialization call of a wrapper failed.
    #[error("initialization of wrapper {proxy} failed with output {output}")]
    MalformedInitPayload {
        /// The address the wrapper would have occupied
        proxy: Address,
        /// The revert output of the initializer
        output: Bytes,
    },

    /// The derived address already holds code.
    #[error("address {0} already holds code")]
    AddressCollision(Address),

    /// The code blob to deploy is empty.
    #[error("refusing to deploy empty code")]
    EmptyCode,

    /// There is no code at the address.
    #[error("no code at {0}")]
    NoCode(Address),

    /// No native logic is registered for the code hash.
    #[error("no logic registered for code hash {0}")]
    UnknownLogic(B256),

    /// A call reverted.
    #[error("call to {to} reverted with output {output}")]
    CallReverted {
        /// The called address
        to: Address,
        /// The revert output
        output: Bytes,
    },

    /// The registry configuration is invalid.
    #[error("invalid registry config: {0}")]
    InvalidConfig(String),
}

/// Result type of registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
