//! Deterministic, idempotent proxy deployment registry for the `MegaETH` toolchain.
//!
//! A deployment is addressed by a [`NamespaceKey`] (the CREATE2 salt). The registry
//!
//! - predicts the address of a proxy before it exists ([`AddressOracle`]),
//! - deploys an implementation and a forwarding wrapper in one atomic unit
//!   ([`ProxyRegistry::deploy_proxy`]),
//! - rejects any second deployment under a key that has already been used.
//!
//! The registry itself is stateless. Idempotency and atomicity are supplied by the
//! [`DeploymentBackend`] it is given: keys are reserved with a single check-and-reserve step
//! and every effect of a deployment is staged in a [`DeploymentScope`] that is either committed
//! as a whole or discarded.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod backend;
pub use backend::*;

mod config;
pub use config::*;

pub mod constants;

mod deployer;
pub use deployer::*;

mod error;
pub use error::*;

mod events;
pub use events::*;

mod oracle;
pub use oracle::*;

mod registry;
pub use registry::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

mod types;
pub use types::*;

mod wrapper;
pub use wrapper::*;
