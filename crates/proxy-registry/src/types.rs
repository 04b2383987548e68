//! Core data types of the registry.

use alloy_primitives::{keccak256, Address, Bytes, B256};
use serde::{Deserialize, Serialize};

/// The namespace key (salt) a deployment is addressed by.
///
/// A key is chosen by the caller and consumed by the first deployment that commits under it.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
    derive_more::Into,
    derive_more::Deref,
)]
#[serde(transparent)]
pub struct NamespaceKey(B256);

impl NamespaceKey {
    /// Wraps a raw 32-byte salt.
    pub const fn new(salt: B256) -> Self {
        Self(salt)
    }

    /// Derives a key from a human-readable prefix and a logical name as
    /// `keccak256(prefix ++ name)`.
    pub fn derive(prefix: &str, name: &str) -> Self {
        let mut preimage = Vec::with_capacity(prefix.len() + name.len());
        preimage.extend_from_slice(prefix.as_bytes());
        preimage.extend_from_slice(name.as_bytes());
        Self(keccak256(preimage))
    }

    /// Returns the raw salt.
    pub const fn salt(&self) -> B256 {
        self.0
    }
}

/// What a [`CodeBlob`] constructs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodeKind {
    /// Code that runs in its own storage context.
    Implementation,
    /// A forwarding wrapper around `implementation`, running `init_data` once at construction.
    Wrapper {
        /// The implementation calls are forwarded to
        implementation: Address,
        /// The one-time initialization call, skipped when empty
        init_data: Bytes,
    },
}

/// A blob of deployable code together with the hash of the image it is addressed by.
///
/// For plain code the image is the code itself. Wrapper construction code is addressed by the
/// wrapper template with placeholder arguments, see [`WrapperTemplate`](crate::WrapperTemplate).
/// The blob's [`CodeKind`] is fixed by its constructor, never inferred from the bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeBlob {
    code: Bytes,
    image_hash: B256,
    kind: CodeKind,
}

impl CodeBlob {
    /// Creates an implementation blob addressed by the hash of its own content.
    pub fn new(code: impl Into<Bytes>) -> Self {
        let code = code.into();
        let image_hash = keccak256(&code);
        Self { code, image_hash, kind: CodeKind::Implementation }
    }

    /// Creates wrapper construction code addressed by `image_hash` instead of its content.
    pub fn wrapper(
        code: impl Into<Bytes>,
        image_hash: B256,
        implementation: Address,
        init_data: Bytes,
    ) -> Self {
        Self { code: code.into(), image_hash, kind: CodeKind::Wrapper { implementation, init_data } }
    }

    /// The code to be constructed.
    pub const fn code(&self) -> &Bytes {
        &self.code
    }

    /// The hash fed into the CREATE2 address derivation.
    pub const fn image_hash(&self) -> B256 {
        self.image_hash
    }

    /// What the blob constructs.
    pub const fn kind(&self) -> &CodeKind {
        &self.kind
    }

    /// Whether the blob holds no code.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

/// A completed proxy deployment. Emitted once per successful
/// [`deploy_proxy`](crate::ProxyRegistry::deploy_proxy) and never revised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    /// Address of the deployed wrapper.
    pub proxy_address: Address,
    /// Key the deployment consumed.
    pub key: NamespaceKey,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{b256, bytes};

    #[test]
    fn test_derive_key_hashes_prefix_and_name() {
        let key = NamespaceKey::derive("mega-", "Counter");
        assert_eq!(key.salt(), keccak256("mega-Counter"));
        assert_ne!(key, NamespaceKey::derive("mega-", "Counter2"));
    }

    #[test]
    fn test_derive_key_is_concatenation() {
        // The preimage is plain concatenation, so the split point does not matter.
        assert_eq!(NamespaceKey::derive("ab", "c"), NamespaceKey::derive("a", "bc"));
    }

    #[test]
    fn test_key_display_is_hex_salt() {
        let salt = b256!("00000000000000000000000000000000000000000000000000000000000000aa");
        let key = NamespaceKey::new(salt);
        assert_eq!(key.to_string(), salt.to_string());
    }

    #[test]
    fn test_code_blob_image_hash() {
        let blob = CodeBlob::new(bytes!("6080604052"));
        assert_eq!(blob.image_hash(), keccak256(bytes!("6080604052")));
        assert_eq!(blob.kind(), &CodeKind::Implementation);
        assert!(!blob.is_empty());

        let image = keccak256("image");
        let blob = CodeBlob::wrapper(bytes!("6080604052"), image, Address::ZERO, Bytes::new());
        assert_eq!(blob.image_hash(), image);
        assert_eq!(
            blob.kind(),
            &CodeKind::Wrapper { implementation: Address::ZERO, init_data: Bytes::new() }
        );
        assert!(CodeBlob::new(Bytes::new()).is_empty());
    }
}
