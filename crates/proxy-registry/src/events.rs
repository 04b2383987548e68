//! Events emitted by the registry.

use alloy_primitives::{Address, Log};
use alloy_sol_types::{sol, SolEvent};

use crate::{DeploymentRecord, NamespaceKey};

sol! {
    /// Emitted once per completed proxy deployment, after both phases succeeded.
    #[derive(Debug, PartialEq, Eq)]
    event ProxyDeployed(address indexed proxy, bytes32 indexed salt);
}

impl DeploymentRecord {
    /// Encodes the record as a `ProxyDeployed` log emitted by `emitter`.
    pub fn to_log(&self, emitter: Address) -> Log {
        let event = ProxyDeployed { proxy: self.proxy_address, salt: self.key.salt() };
        Log { address: emitter, data: event.encode_log_data() }
    }

    /// Decodes a record from a `ProxyDeployed` log. Returns `None` for any other log.
    pub fn from_log(log: &Log) -> Option<Self> {
        let event = ProxyDeployed::decode_log_data(&log.data, true).ok()?;
        Some(Self { proxy_address: event.proxy, key: NamespaceKey::new(event.salt) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, keccak256, LogData};

    #[test]
    fn test_record_log_topics() {
        let record = DeploymentRecord {
            proxy_address: address!("1000000000000000000000000000000000000001"),
            key: NamespaceKey::derive("mega-", "Oracle"),
        };
        let log = record.to_log(address!("4e59b44847b379578588920ca78fbf26c0b4956c"));

        let topics = log.data.topics();
        assert_eq!(topics.len(), 3);
        assert_eq!(topics[0], keccak256("ProxyDeployed(address,bytes32)"));
        assert_eq!(topics[2], record.key.salt());
        assert!(log.data.data.is_empty());
        assert_eq!(DeploymentRecord::from_log(&log), Some(record));
    }

    #[test]
    fn test_foreign_log_is_not_a_record() {
        let log = Log {
            address: Address::ZERO,
            data: LogData::new_unchecked(vec![keccak256("Other()")], Default::default()),
        };
        assert_eq!(DeploymentRecord::from_log(&log), None);
    }
}
