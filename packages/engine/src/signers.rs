use std::collections::BTreeMap;

use alloy_primitives::{address, Address};
use async_trait::async_trait;

use crate::{apis::SignerDiscovery, error::TransportError};

/// Signer discovery from a fixed, configured table
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticSignerRegistry {
    signers: BTreeMap<String, Vec<Address>>,
}

impl StaticSignerRegistry {
    /// The public signer of the `redstone-main-demo` data service
    pub const MAIN_DEMO_SIGNER: Address = address!("0C39486f770B26F5527BBBf942726537986Cd7eb");

    pub fn new(signers: BTreeMap<String, Vec<Address>>) -> Self {
        Self { signers }
    }

    /// The well-known public signer sets
    pub fn known() -> BTreeMap<String, Vec<Address>> {
        BTreeMap::from([(
            "redstone-main-demo".to_string(),
            vec![Self::MAIN_DEMO_SIGNER],
        )])
    }
}

#[async_trait]
impl SignerDiscovery for StaticSignerRegistry {
    async fn resolve_signers(&self, service_id: &str) -> Result<Vec<Address>, TransportError> {
        match self.signers.get(service_id) {
            Some(signers) if !signers.is_empty() => Ok(signers.clone()),
            Some(_) => Err(TransportError::SignerDiscovery(format!(
                "no signers configured for {service_id:?}"
            ))),
            None => Err(TransportError::SignerDiscovery(format!(
                "unknown data service {service_id:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_configured_services() {
        let mut table = StaticSignerRegistry::known();
        table.insert("empty-service".to_string(), vec![]);
        let registry = StaticSignerRegistry::new(table);

        assert_eq!(
            registry.resolve_signers("redstone-main-demo").await.unwrap(),
            vec![StaticSignerRegistry::MAIN_DEMO_SIGNER]
        );
        assert!(matches!(
            registry.resolve_signers("empty-service").await.unwrap_err(),
            TransportError::SignerDiscovery(_)
        ));
        assert!(matches!(
            registry.resolve_signers("nope").await.unwrap_err(),
            TransportError::SignerDiscovery(_)
        ));
    }
}
