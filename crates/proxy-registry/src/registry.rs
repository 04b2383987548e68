//! The proxy deployment registry.

use alloy_primitives::{Address, Bytes};
use tracing::info;

use crate::{
    AddressOracle, DeploymentBackend, DeploymentRecord, DeploymentScope, ImplementationDeployer,
    NamespaceKey, RegistryConfig, RegistryResult, WrapperDeployer, WrapperTemplate,
};

/// Deploys implementation/wrapper pairs at deterministic addresses, at most once per key.
///
/// The registry holds no mutable state. Every deployment runs inside one scope of the backend:
/// the key is reserved before the implementation is deployed, and nothing becomes visible until
/// both phases succeeded and the `ProxyDeployed` record was staged. Any failure drops the scope,
/// which discards all staged effects.
#[derive(Clone, Debug)]
pub struct ProxyRegistry<B> {
    backend: B,
    oracle: AddressOracle,
    implementation_deployer: ImplementationDeployer,
    wrapper_deployer: WrapperDeployer,
}

impl<B: DeploymentBackend> ProxyRegistry<B> {
    /// Creates a registry deploying through `backend` with the default wrapper template.
    pub fn new(backend: B) -> Self {
        Self::with_template(backend, WrapperTemplate::default())
    }

    /// Creates a registry deploying through `backend` with the configured wrapper template.
    pub fn with_config(backend: B, config: &RegistryConfig) -> Self {
        Self::with_template(backend, config.wrapper())
    }

    /// Creates a registry deploying through `backend` with the given wrapper template.
    pub fn with_template(backend: B, template: WrapperTemplate) -> Self {
        let oracle = AddressOracle::new(backend.deployer(), template.clone());
        Self {
            backend,
            oracle,
            implementation_deployer: ImplementationDeployer,
            wrapper_deployer: WrapperDeployer::new(template),
        }
    }

    /// The backend deployments go through.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// The oracle predicting this registry's addresses.
    pub const fn oracle(&self) -> &AddressOracle {
        &self.oracle
    }

    /// Returns the address `deploy_proxy(key, ..)` deploys the wrapper at.
    ///
    /// Pure: the answer does not depend on whether, or with what, the key was deployed.
    pub fn compute_proxy_address(&self, key: NamespaceKey) -> Address {
        self.oracle.predict(key)
    }

    /// Returns the address `deploy_proxy(key, code, ..)` deploys the implementation at.
    pub fn compute_implementation_address(&self, key: NamespaceKey, code: &[u8]) -> Address {
        self.oracle.predict_implementation(key, code)
    }

    /// Deploys `code` as a standalone implementation under `key`, consuming the key.
    pub fn deploy_implementation(
        &self,
        key: NamespaceKey,
        code: impl Into<Bytes>,
    ) -> RegistryResult<Address> {
        let mut scope = self.backend.reserve(key)?;
        let address = self.implementation_deployer.deploy(&mut scope, code.into())?;
        scope.commit()?;
        Ok(address)
    }

    /// Deploys `implementation_code`, then a wrapper forwarding to it that runs `init_data`
    /// once, both under `key`. Returns the wrapper's address, which equals
    /// [`compute_proxy_address(key)`](Self::compute_proxy_address).
    ///
    /// Fails with [`KeyAlreadyUsed`](crate::RegistryError::KeyAlreadyUsed) if `key` was used
    /// before. On any failure nothing is deployed and no record is emitted.
    pub fn deploy_proxy(
        &self,
        key: NamespaceKey,
        implementation_code: impl Into<Bytes>,
        init_data: impl Into<Bytes>,
    ) -> RegistryResult<Address> {
        let init_data = init_data.into();
        let mut scope = self.backend.reserve(key)?;

        let implementation =
            self.implementation_deployer.deploy(&mut scope, implementation_code.into())?;
        let proxy = self.wrapper_deployer.deploy(&mut scope, implementation, &init_data)?;

        let record = DeploymentRecord { proxy_address: proxy, key };
        scope.emit(record.to_log(self.oracle.deployer()));
        scope.commit()?;

        debug_assert_eq!(proxy, self.compute_proxy_address(key), "proxy address diverged");
        info!(key = %key, proxy = %proxy, implementation = %implementation, "Proxy deployed");
        Ok(proxy)
    }
}
