//! Registry configuration.

use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

use crate::{constants::WRAPPER_TEMPLATE, NamespaceKey, RegistryError, RegistryResult, WrapperTemplate};

/// Configuration of a [`ProxyRegistry`](crate::ProxyRegistry).
///
/// ```json
/// { "saltPrefix": "mega-v1-", "wrapperTemplate": "0x6080..." }
/// ```
///
/// Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RegistryConfig {
    /// Prefix prepended to logical names when deriving namespace keys.
    pub salt_prefix: String,
    /// Creation code of the forwarding wrapper.
    pub wrapper_template: Bytes,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { salt_prefix: String::new(), wrapper_template: Bytes::from_static(WRAPPER_TEMPLATE) }
    }
}

impl RegistryConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> RegistryResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| RegistryError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values no registry can work with.
    pub fn validate(&self) -> RegistryResult<()> {
        if self.wrapper_template.is_empty() {
            return Err(RegistryError::InvalidConfig("wrapper template is empty".to_string()));
        }
        Ok(())
    }

    /// Derives the namespace key of the logical deployment `name`.
    pub fn key(&self, name: &str) -> NamespaceKey {
        NamespaceKey::derive(&self.salt_prefix, name)
    }

    /// The configured wrapper template.
    pub fn wrapper(&self) -> WrapperTemplate {
        WrapperTemplate::new(self.wrapper_template.clone())
    }
}
