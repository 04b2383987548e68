//! The forwarding wrapper's construction code.

use alloy_primitives::{keccak256, Address, Bytes, B256};
use alloy_sol_types::SolValue;

use crate::{
    constants::{PLACEHOLDER_IMPLEMENTATION, WRAPPER_TEMPLATE},
    CodeBlob,
};

/// The creation code of the forwarding wrapper, shared by the address oracle and the wrapper
/// deployer.
///
/// Construction code is `template ++ abi.encode(implementation, data)`. Every piece of
/// construction code built from one template is addressed by the same image: the template with
/// a zero implementation and empty data. This keeps a wrapper's address independent of what it
/// is eventually configured with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrapperTemplate {
    code: Bytes,
    image_hash: B256,
}

impl Default for WrapperTemplate {
    fn default() -> Self {
        Self::new(Bytes::from_static(WRAPPER_TEMPLATE))
    }
}

impl WrapperTemplate {
    /// Creates a template from the wrapper's creation code.
    pub fn new(code: impl Into<Bytes>) -> Self {
        let code = code.into();
        let image_hash = keccak256(encode(&code, PLACEHOLDER_IMPLEMENTATION, &Bytes::new()));
        Self { code, image_hash }
    }

    /// The creation code without constructor arguments.
    pub const fn code(&self) -> &Bytes {
        &self.code
    }

    /// Hash of the template with placeholder arguments.
    pub const fn image_hash(&self) -> B256 {
        self.image_hash
    }

    /// Builds the construction code for a wrapper around `implementation` that runs
    /// `init_data` once.
    pub fn construction_code(&self, implementation: Address, init_data: &Bytes) -> CodeBlob {
        CodeBlob::wrapper(
            encode(&self.code, implementation, init_data),
            self.image_hash,
            implementation,
            init_data.clone(),
        )
    }
}

fn encode(template: &[u8], implementation: Address, init_data: &Bytes) -> Vec<u8> {
    let args = (implementation, init_data.clone()).abi_encode_params();
    let mut code = Vec::with_capacity(template.len() + args.len());
    code.extend_from_slice(template);
    code.extend_from_slice(&args);
    code
}
