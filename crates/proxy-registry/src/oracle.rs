//! Address prediction for proxy deployments.

use alloy_primitives::{keccak256, Address, B256};

use crate::{NamespaceKey, WrapperTemplate};

/// Predicts the addresses of a deployment before it exists.
///
/// Addresses follow the CREATE2 rule
/// `keccak256(0xff ++ deployer ++ salt ++ image_hash)[12:]`. The oracle is pure: it reads no
/// backend state and gives the same answer before and after a deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressOracle {
    deployer: Address,
    wrapper: WrapperTemplate,
}

impl AddressOracle {
    /// Creates an oracle for deployments made by `deployer` with the given wrapper template.
    pub const fn new(deployer: Address, wrapper: WrapperTemplate) -> Self {
        Self { deployer, wrapper }
    }

    /// The deployer identity addresses are derived for.
    pub const fn deployer(&self) -> Address {
        self.deployer
    }

    /// The wrapper template proxy addresses are derived from.
    pub const fn wrapper(&self) -> &WrapperTemplate {
        &self.wrapper
    }

    /// Hash of the wrapper template with placeholder arguments, the image every proxy is
    /// addressed by.
    pub const fn wrapper_image_hash(&self) -> B256 {
        self.wrapper.image_hash()
    }

    /// Predicts the address of the wrapper deployed under `key`.
    ///
    /// The wrapper is addressed by its template with placeholder arguments, so the prediction
    /// holds for any implementation and initializer the deployment is made with.
    pub fn predict(&self, key: NamespaceKey) -> Address {
        self.deployer.create2(key.salt(), self.wrapper_image_hash())
    }

    /// Predicts the address of the implementation deployed under `key` from `code`.
    pub fn predict_implementation(&self, key: NamespaceKey, code: &[u8]) -> Address {
        self.deployer.create2(key.salt(), keccak256(code))
    }
}
