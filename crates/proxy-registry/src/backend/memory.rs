//! An in-memory deployment backend.
//!
//! The backend keeps a world of [`Account`]s, the set of consumed keys and the published logs
//! behind one lock. Reserving a key and publishing a scope each take the lock once, which makes
//! both steps atomic with respect to concurrent callers.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, MutexGuard, PoisonError,
};

use alloy_primitives::{
    map::{HashMap, HashSet},
    Address, Bytes, Log,
};
use tracing::{debug, trace, warn};

use super::{
    Account, AccountKind, ContractLogic, DeploymentBackend, DeploymentScope, LogicTable,
};
use crate::{
    constants::DEFAULT_DEPLOYER, CodeBlob, CodeKind, DeploymentRecord, NamespaceKey,
    RegistryError, RegistryResult,
};

#[derive(Debug, Default)]
struct WorldState {
    accounts: HashMap<Address, Account>,
    consumed: HashSet<NamespaceKey>,
    reserved: HashSet<NamespaceKey>,
    logs: Vec<Log>,
}

/// A deployment backend holding all state in memory.
///
/// Besides deploying, the backend can execute calls into deployed artifacts: implementation
/// code is resolved through its [`LogicTable`], and blobs of kind [`CodeKind::Wrapper`] produce
/// a forwarding wrapper.
#[derive(Debug)]
pub struct InMemoryBackend {
    deployer: Address,
    logic: LogicTable,
    online: AtomicBool,
    state: Mutex<WorldState>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new(DEFAULT_DEPLOYER)
    }
}

impl InMemoryBackend {
    /// Creates an empty backend deploying as `deployer`.
    pub fn new(deployer: Address) -> Self {
        Self {
            deployer,
            logic: LogicTable::default(),
            online: AtomicBool::new(true),
            state: Mutex::default(),
        }
    }

    /// Registers `logic` as the executable behavior of `code`.
    pub fn with_logic(mut self, code: &[u8], logic: impl ContractLogic + 'static) -> Self {
        self.register_logic(code, logic);
        self
    }

    /// Registers `logic` as the executable behavior of `code`.
    pub fn register_logic(&mut self, code: &[u8], logic: impl ContractLogic + 'static) {
        let code_hash = self.logic.insert(code, logic);
        trace!(code_hash = %code_hash, "Registered contract logic");
    }

    /// Takes the backend on- or offline. An offline backend refuses every reservation.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Whether the backend accepts reservations.
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Whether `key` has been consumed by a committed scope.
    pub fn is_consumed(&self, key: &NamespaceKey) -> bool {
        self.state().consumed.contains(key)
    }

    /// The code constructed at `address`, if any.
    pub fn code_at(&self, address: Address) -> Option<Bytes> {
        self.state().accounts.get(&address).map(|account| account.code.clone())
    }

    /// A snapshot of the account at `address`, if any.
    pub fn account(&self, address: Address) -> Option<Account> {
        self.state().accounts.get(&address).cloned()
    }

    /// The implementation the wrapper at `address` forwards to.
    pub fn implementation_of(&self, address: Address) -> Option<Address> {
        self.state().accounts.get(&address).and_then(Account::implementation_address)
    }

    /// Number of deployed accounts.
    pub fn account_count(&self) -> usize {
        self.state().accounts.len()
    }

    /// All published logs, in publication order.
    pub fn logs(&self) -> Vec<Log> {
        self.state().logs.clone()
    }

    /// All published deployment records, in publication order.
    pub fn records(&self) -> Vec<DeploymentRecord> {
        self.state().logs.iter().filter_map(DeploymentRecord::from_log).collect()
    }

    /// Calls the artifact at `to` with `input`.
    ///
    /// Wrappers forward the call to their implementation's logic, executed on the wrapper's
    /// storage. Storage changes of a reverted call are discarded.
    pub fn call(&self, to: Address, input: &[u8]) -> RegistryResult<Bytes> {
        let mut state = self.state();
        let target = state.accounts.get(&to).ok_or(RegistryError::NoCode(to))?;

        let (code_address, code_hash) = match target.kind {
            AccountKind::Implementation => (to, target.code_hash),
            AccountKind::Wrapper { implementation } => {
                let code_hash = state
                    .accounts
                    .get(&implementation)
                    .ok_or(RegistryError::NoCode(implementation))?
                    .code_hash;
                (implementation, code_hash)
            }
        };
        let logic = self.logic.get(&code_hash).ok_or(RegistryError::UnknownLogic(code_hash))?;

        let account = state.accounts.get_mut(&to).ok_or(RegistryError::NoCode(to))?;
        let checkpoint = account.storage.clone();
        let result = if code_address == to {
            account.execute(to, logic, input)
        } else {
            account.forward(to, code_address, logic, input)
        };

        result.map_err(|output| {
            account.storage = checkpoint;
            debug!(to = %to, output = %output, "Call reverted");
            RegistryError::CallReverted { to, output }
        })
    }

    fn state(&self) -> MutexGuard<'_, WorldState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeploymentBackend for InMemoryBackend {
    type Scope<'a> = MemoryScope<'a>;

    fn deployer(&self) -> Address {
        self.deployer
    }

    fn reserve(&self, key: NamespaceKey) -> RegistryResult<MemoryScope<'_>> {
        if !self.is_online() {
            return Err(RegistryError::BackendUnavailable("backend is offline".to_string()));
        }

        let mut state = self.state();
        if state.consumed.contains(&key) || !state.reserved.insert(key) {
            debug!(key = %key, "Rejected reservation of used key");
            return Err(RegistryError::KeyAlreadyUsed(key));
        }
        trace!(key = %key, "Reserved key");

        Ok(MemoryScope {
            backend: self,
            key,
            staged: HashMap::default(),
            order: Vec::new(),
            logs: Vec::new(),
            committed: false,
        })
    }
}

/// Deployments staged under one key of an [`InMemoryBackend`].
#[derive(Debug)]
pub struct MemoryScope<'a> {
    backend: &'a InMemoryBackend,
    key: NamespaceKey,
    staged: HashMap<Address, Account>,
    order: Vec<Address>,
    logs: Vec<Log>,
    committed: bool,
}

impl MemoryScope<'_> {
    /// Addresses deployed in this scope so far, in deployment order.
    pub fn staged_addresses(&self) -> &[Address] {
        &self.order
    }

    /// Runs the wrapper constructor: records the implementation and delegates `init_data` to
    /// it once.
    fn construct_wrapper(
        &self,
        state: &WorldState,
        address: Address,
        code: &Bytes,
        implementation: Address,
        init_data: &Bytes,
    ) -> RegistryResult<Account> {
        let code_hash = self
            .staged
            .get(&implementation)
            .or_else(|| state.accounts.get(&implementation))
            .ok_or(RegistryError::NoCode(implementation))?
            .code_hash;

        let mut wrapper = Account::wrapper(self.key, code.clone(), implementation);
        if init_data.is_empty() {
            return Ok(wrapper);
        }

        let logic =
            self.backend.logic.get(&code_hash).ok_or(RegistryError::UnknownLogic(code_hash))?;
        wrapper.forward(address, implementation, logic, init_data).map_err(|output| {
            RegistryError::MalformedInitPayload { proxy: address, output }
        })?;
        Ok(wrapper)
    }
}

impl DeploymentScope for MemoryScope<'_> {
    fn key(&self) -> NamespaceKey {
        self.key
    }

    fn deploy(&mut self, code: &CodeBlob) -> RegistryResult<Address> {
        if code.is_empty() {
            return Err(RegistryError::EmptyCode);
        }

        let address = self.backend.deployer.create2(self.key.salt(), code.image_hash());
        let state = self.backend.state();
        if self.staged.contains_key(&address) || state.accounts.contains_key(&address) {
            return Err(RegistryError::AddressCollision(address));
        }

        let account = match code.kind() {
            CodeKind::Implementation => Account::implementation(self.key, code.code().clone()),
            CodeKind::Wrapper { implementation, init_data } => self.construct_wrapper(
                &state,
                address,
                code.code(),
                *implementation,
                init_data,
            )?,
        };
        drop(state);

        trace!(key = %self.key, address = %address, kind = ?account.kind, "Staged deployment");
        self.staged.insert(address, account);
        self.order.push(address);
        Ok(address)
    }

    fn emit(&mut self, log: Log) {
        self.logs.push(log);
    }

    fn commit(mut self) -> RegistryResult<()> {
        let mut state = self.backend.state();
        if let Some(address) = self.order.iter().find(|address| state.accounts.contains_key(*address))
        {
            let address = *address;
            drop(state);
            return Err(RegistryError::AddressCollision(address));
        }

        for address in self.order.drain(..) {
            if let Some(account) = self.staged.remove(&address) {
                state.accounts.insert(address, account);
            }
        }
        state.logs.append(&mut self.logs);
        state.reserved.remove(&self.key);
        state.consumed.insert(self.key);
        self.committed = true;

        debug!(key = %self.key, "Committed deployment scope");
        Ok(())
    }
}

impl Drop for MemoryScope<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        self.backend.state().reserved.remove(&self.key);
        if !self.order.is_empty() || !self.logs.is_empty() {
            warn!(
                key = %self.key,
                discarded_accounts = self.order.len(),
                discarded_logs = self.logs.len(),
                "Discarded uncommitted deployment scope"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{bytes, keccak256, U256};
    use alloy_sol_types::SolValue;

    use crate::{backend::CallContext, WrapperTemplate};

    /// Adds the first input word to slot 0 and returns the new value. Reverts on zero.
    #[derive(Debug)]
    struct Accumulator;

    impl ContractLogic for Accumulator {
        fn execute(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Bytes, Bytes> {
            let amount = U256::abi_decode(input, true).map_err(|_| Bytes::new())?;
            let value = ctx.sload(U256::ZERO) + amount;
            ctx.sstore(U256::ZERO, value);
            if amount.is_zero() {
                return Err(Bytes::from_static(b"zero"));
            }
            Ok(value.abi_encode().into())
        }
    }

    const ACCUMULATOR_CODE: &[u8] = &[0x60, 0x01, 0x60, 0x00, 0x55];

    fn backend() -> InMemoryBackend {
        InMemoryBackend::default().with_logic(ACCUMULATOR_CODE, Accumulator)
    }

    fn key(name: &str) -> NamespaceKey {
        NamespaceKey::derive("test-", name)
    }

    #[test]
    fn test_reserve_is_exclusive() {
        let backend = backend();
        let scope = backend.reserve(key("a")).unwrap();
        assert_eq!(backend.reserve(key("a")).unwrap_err(), RegistryError::KeyAlreadyUsed(key("a")));
        assert!(backend.reserve(key("b")).is_ok());

        drop(scope);
        assert!(backend.reserve(key("a")).is_ok());
    }

    #[test]
    fn test_commit_consumes_key() {
        let backend = backend();
        let mut scope = backend.reserve(key("a")).unwrap();
        let address = scope.deploy(&CodeBlob::new(ACCUMULATOR_CODE)).unwrap();
        assert_eq!(scope.staged_addresses(), &[address]);
        assert_eq!(backend.code_at(address), None);

        scope.commit().unwrap();
        assert!(backend.is_consumed(&key("a")));
        assert_eq!(backend.code_at(address), Some(Bytes::from_static(ACCUMULATOR_CODE)));
        assert_eq!(backend.reserve(key("a")).unwrap_err(), RegistryError::KeyAlreadyUsed(key("a")));
    }

    #[test]
    fn test_dropped_scope_discards_everything() {
        let backend = backend();
        let mut scope = backend.reserve(key("a")).unwrap();
        let address = scope.deploy(&CodeBlob::new(ACCUMULATOR_CODE)).unwrap();
        scope.emit(Log::default());
        drop(scope);

        assert_eq!(backend.code_at(address), None);
        assert!(backend.logs().is_empty());
        assert!(!backend.is_consumed(&key("a")));
        assert_eq!(backend.account_count(), 0);
    }

    #[test]
    fn test_offline_backend_refuses_reservations() {
        let backend = backend();
        backend.set_online(false);
        assert!(matches!(
            backend.reserve(key("a")),
            Err(RegistryError::BackendUnavailable(_))
        ));
        backend.set_online(true);
        assert!(backend.reserve(key("a")).is_ok());
    }

    #[test]
    fn test_deploy_rejects_empty_code_and_collisions() {
        let backend = backend();
        let mut scope = backend.reserve(key("a")).unwrap();
        assert_eq!(scope.deploy(&CodeBlob::new(Bytes::new())), Err(RegistryError::EmptyCode));

        let address = scope.deploy(&CodeBlob::new(ACCUMULATOR_CODE)).unwrap();
        assert_eq!(
            scope.deploy(&CodeBlob::new(ACCUMULATOR_CODE)),
            Err(RegistryError::AddressCollision(address))
        );
    }

    #[test]
    fn test_deploy_address_is_create2() {
        let backend = backend();
        let mut scope = backend.reserve(key("a")).unwrap();
        let blob = CodeBlob::new(ACCUMULATOR_CODE);
        let address = scope.deploy(&blob).unwrap();
        assert_eq!(address, DEFAULT_DEPLOYER.create2(key("a").salt(), blob.image_hash()));
    }

    #[test]
    fn test_wrapper_forwards_to_implementation() {
        let backend = backend();
        let template = WrapperTemplate::default();
        let mut scope = backend.reserve(key("a")).unwrap();
        let implementation = scope.deploy(&CodeBlob::new(ACCUMULATOR_CODE)).unwrap();
        let init: Bytes = U256::from(5).abi_encode().into();
        let proxy = scope.deploy(&template.construction_code(implementation, &init)).unwrap();
        scope.commit().unwrap();

        assert_eq!(backend.implementation_of(proxy), Some(implementation));
        assert_eq!(backend.implementation_of(implementation), None);

        let out = backend.call(proxy, &U256::from(2).abi_encode()).unwrap();
        assert_eq!(U256::abi_decode(&out, true).unwrap(), U256::from(7));

        // the implementation's own storage is untouched by calls through the wrapper
        let out = backend.call(implementation, &U256::from(1).abi_encode()).unwrap();
        assert_eq!(U256::abi_decode(&out, true).unwrap(), U256::from(1));
    }

    #[test]
    fn test_reverted_call_discards_storage_changes() {
        let backend = backend();
        let mut scope = backend.reserve(key("a")).unwrap();
        let implementation = scope.deploy(&CodeBlob::new(ACCUMULATOR_CODE)).unwrap();
        scope.commit().unwrap();

        backend.call(implementation, &U256::from(3).abi_encode()).unwrap();
        let err = backend.call(implementation, &U256::ZERO.abi_encode()).unwrap_err();
        assert_eq!(
            err,
            RegistryError::CallReverted { to: implementation, output: Bytes::from_static(b"zero") }
        );
        let account = backend.account(implementation).unwrap();
        assert_eq!(account.storage.get(&U256::ZERO), Some(&U256::from(3)));
    }

    #[test]
    fn test_failing_initializer_aborts_wrapper() {
        let backend = backend();
        let template = WrapperTemplate::default();
        let mut scope = backend.reserve(key("a")).unwrap();
        let implementation = scope.deploy(&CodeBlob::new(ACCUMULATOR_CODE)).unwrap();
        let blob = template.construction_code(implementation, &bytes!("00"));
        let proxy = DEFAULT_DEPLOYER.create2(key("a").salt(), template.image_hash());

        assert_eq!(
            scope.deploy(&blob),
            Err(RegistryError::MalformedInitPayload { proxy, output: Bytes::new() })
        );
        assert_eq!(scope.staged_addresses(), &[implementation]);
    }

    #[test]
    fn test_wrapper_requires_implementation_code() {
        let backend = backend();
        let template = WrapperTemplate::default();
        let mut scope = backend.reserve(key("a")).unwrap();
        let missing = Address::repeat_byte(0x11);
        assert_eq!(
            scope.deploy(&template.construction_code(missing, &Bytes::new())),
            Err(RegistryError::NoCode(missing))
        );
    }

    #[test]
    fn test_implementation_starting_with_template_stays_implementation() {
        let template = WrapperTemplate::default();
        let mut code = template.code().to_vec();
        code.extend_from_slice(ACCUMULATOR_CODE);
        let backend = InMemoryBackend::default().with_logic(&code, Accumulator);

        let mut scope = backend.reserve(key("a")).unwrap();
        let address = scope.deploy(&CodeBlob::new(code.clone())).unwrap();
        scope.commit().unwrap();

        assert_eq!(address, DEFAULT_DEPLOYER.create2(key("a").salt(), keccak256(&code)));
        assert_eq!(backend.account(address).unwrap().kind, AccountKind::Implementation);
        let out = backend.call(address, &U256::from(4).abi_encode()).unwrap();
        assert_eq!(U256::abi_decode(&out, true).unwrap(), U256::from(4));
    }

    #[test]
    fn test_wrapper_built_from_any_template() {
        let backend = backend();
        let template = WrapperTemplate::new(bytes!("6080604052"));
        let mut scope = backend.reserve(key("a")).unwrap();
        let implementation = scope.deploy(&CodeBlob::new(ACCUMULATOR_CODE)).unwrap();
        let init: Bytes = U256::from(6).abi_encode().into();
        let proxy = scope.deploy(&template.construction_code(implementation, &init)).unwrap();
        scope.commit().unwrap();

        assert_eq!(backend.implementation_of(proxy), Some(implementation));
        let out = backend.call(proxy, &U256::from(1).abi_encode()).unwrap();
        assert_eq!(U256::abi_decode(&out, true).unwrap(), U256::from(7));
    }

    #[test]
    fn test_call_unknown_logic_and_missing_code() {
        let backend = backend();
        let mut scope = backend.reserve(key("a")).unwrap();
        let code = bytes!("6080604052");
        let address = scope.deploy(&CodeBlob::new(code.clone())).unwrap();
        scope.commit().unwrap();

        assert_eq!(
            backend.call(address, &[]),
            Err(RegistryError::UnknownLogic(keccak256(&code)))
        );
        assert_eq!(backend.call(Address::ZERO, &[]), Err(RegistryError::NoCode(Address::ZERO)));
    }
}
