//! The deployment backend capability consumed by the registry.
//!
//! A backend places code at CREATE2-derived addresses and enforces that every namespace key is
//! used by at most one committed deployment. The registry never keeps its own bookkeeping; it
//! relies entirely on the two guarantees below.
//!
//! # Key reservation
//!
//! [`DeploymentBackend::reserve`] is a single check-and-reserve step. It fails with
//! [`KeyAlreadyUsed`](crate::RegistryError::KeyAlreadyUsed) when the key has been consumed, or
//! when another scope currently holds it. Exactly one of several racing callers wins.
//!
//! # Scoped effects
//!
//! All effects of a deployment are staged in the returned [`DeploymentScope`], in the way an EVM
//! journal stages the effects of a call frame behind a checkpoint:
//!
//! ```text
//! reserve(key) ──> deploy(code) ──> deploy(code') ──> emit(log) ──> commit()
//!      │                 │                │                │
//!      └─────────────────┴────────────────┴────────────────┴──> drop: discard, release key
//! ```
//!
//! Nothing is visible outside the scope until [`DeploymentScope::commit`], which publishes
//! every staged account and log and consumes the key. Dropping a scope without committing
//! discards everything it staged and releases the key.

mod account;
mod logic;
mod memory;

pub use account::*;
pub use logic::*;
pub use memory::*;

use std::sync::Arc;

use alloy_primitives::{Address, Log};

use crate::{CodeBlob, NamespaceKey, RegistryResult};

/// A capability that deploys code at addresses derived from a namespace key.
pub trait DeploymentBackend {
    /// The scope deployments under one reserved key are staged in.
    type Scope<'a>: DeploymentScope
    where
        Self: 'a;

    /// The identity addresses are derived for (the CREATE2 deployer).
    fn deployer(&self) -> Address;

    /// Atomically checks that `key` is unused and reserves it for the returned scope.
    fn reserve(&self, key: NamespaceKey) -> RegistryResult<Self::Scope<'_>>;
}

/// Deployments staged under one reserved namespace key.
pub trait DeploymentScope {
    /// The key this scope holds.
    fn key(&self) -> NamespaceKey;

    /// Constructs `code` at `create2(deployer, key, code.image_hash())` and returns the
    /// address.
    ///
    /// Several blobs may be deployed under the same scope as long as their image hashes differ.
    fn deploy(&mut self, code: &CodeBlob) -> RegistryResult<Address>;

    /// Stages a log to be published on commit.
    fn emit(&mut self, log: Log);

    /// Publishes everything staged and consumes the key.
    fn commit(self) -> RegistryResult<()>
    where
        Self: Sized;
}

impl<T: DeploymentBackend + ?Sized> DeploymentBackend for &T {
    type Scope<'a>
        = T::Scope<'a>
    where
        Self: 'a;

    fn deployer(&self) -> Address {
        (**self).deployer()
    }

    fn reserve(&self, key: NamespaceKey) -> RegistryResult<Self::Scope<'_>> {
        (**self).reserve(key)
    }
}

impl<T: DeploymentBackend + ?Sized> DeploymentBackend for Arc<T> {
    type Scope<'a>
        = T::Scope<'a>
    where
        Self: 'a;

    fn deployer(&self) -> Address {
        (**self).deployer()
    }

    fn reserve(&self, key: NamespaceKey) -> RegistryResult<Self::Scope<'_>> {
        (**self).reserve(key)
    }
}
