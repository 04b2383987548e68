//! Constants of the proxy registry.

use alloy_primitives::{address, hex, Address};

/// Creation code of the forwarding wrapper.
///
/// The constructor arguments `(address implementation, bytes data)` are appended ABI-encoded
/// behind this prefix. The constructor records the implementation and, when `data` is
/// non-empty, delegates `data` to the implementation once.
pub const WRAPPER_TEMPLATE: &[u8] = &hex!(
    "608060405260405161040c38038061040c83398101604081905261002291610268565b61002c8282610033565b5050"
    "610352565b61003c82610092565b6040516001600160a01b038316907fbc7cd75a20ee27fd9adebab32041f755"
    "214dbc6bffa90cc0225b39da2e5c2d3b90600090a280511561008657610081828261010e565b505050565b"
);

/// Implementation address the address oracle encodes in place of the real one.
pub const PLACEHOLDER_IMPLEMENTATION: Address = Address::ZERO;

/// Deployer identity used by the in-memory backend when none is given.
///
/// This is the address of the canonical CREATE2 factory deployed with Nick's method.
pub const DEFAULT_DEPLOYER: Address = address!("4e59b44847b379578588920ca78fbf26c0b4956c");
