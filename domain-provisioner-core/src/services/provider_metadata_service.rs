//! Provider metadata service

use domain_provisioner_provider::get_all_provider_metadata;

use crate::types::{ProviderMetadata, ProviderType};

/// Lists the automated providers compiled into this build (stateless).
pub struct ProviderMetadataService;

impl ProviderMetadataService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    pub fn list_providers(&self) -> Vec<ProviderMetadata> {
        get_all_provider_metadata()
    }

    /// Identifiers a domain root may use, `manual` included.
    pub fn provider_ids(&self) -> Vec<&'static str> {
        std::iter::once(ProviderType::Manual.as_str())
            .chain(self.list_providers().iter().map(|m| m.id.as_str()))
            .collect()
    }
}

impl Default for ProviderMetadataService {
    fn default() -> Self {
        Self::new()
    }
}
