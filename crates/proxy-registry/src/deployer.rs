//! The two deployment phases of a proxy deployment.

use alloy_primitives::{Address, Bytes};
use tracing::debug;

use crate::{CodeBlob, DeploymentScope, RegistryResult, WrapperTemplate};

/// Deploys the implementation artifact of a deployment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImplementationDeployer;

impl ImplementationDeployer {
    /// Deploys `code` verbatim under the scope's key.
    pub fn deploy<S: DeploymentScope>(&self, scope: &mut S, code: Bytes) -> RegistryResult<Address> {
        let address = scope.deploy(&CodeBlob::new(code))?;
        debug!(key = %scope.key(), implementation = %address, "Deployed implementation");
        Ok(address)
    }
}

/// Deploys the forwarding wrapper of a deployment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WrapperDeployer {
    template: WrapperTemplate,
}

impl WrapperDeployer {
    /// Creates a deployer building wrappers from `template`.
    pub const fn new(template: WrapperTemplate) -> Self {
        Self { template }
    }

    /// The template wrappers are built from.
    pub const fn template(&self) -> &WrapperTemplate {
        &self.template
    }

    /// Builds the wrapper construction code `template ++ abi.encode(implementation, init_data)`.
    pub fn construction_code(&self, implementation: Address, init_data: &Bytes) -> CodeBlob {
        self.template.construction_code(implementation, init_data)
    }

    /// Deploys a wrapper around `implementation` under the scope's key, running `init_data`
    /// once at construction.
    pub fn deploy<S: DeploymentScope>(
        &self,
        scope: &mut S,
        implementation: Address,
        init_data: &Bytes,
    ) -> RegistryResult<Address> {
        let address = scope.deploy(&self.construction_code(implementation, init_data))?;
        debug!(
            key = %scope.key(),
            proxy = %address,
            implementation = %implementation,
            init_len = init_data.len(),
            "Deployed wrapper"
        );
        Ok(address)
    }
}
