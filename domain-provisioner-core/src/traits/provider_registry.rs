//! Provider registry abstract Trait

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use domain_provisioner_provider::{DomainProvider, DomainRoot};

/// Provider Registry Trait
///
/// Holds one provider instance per provider id (`"cloudflare"`). Roots whose
/// provider is not registered, such as `manual`, resolve to `None` and are
/// activated without an API call.
#[async_trait]
pub trait ProviderRegistry: Send + Sync {
    /// Register a provider under its [`DomainProvider::id`]
    async fn register(&self, provider: Arc<dyn DomainProvider>);

    async fn unregister(&self, provider_id: &str);

    async fn get(&self, provider_id: &str) -> Option<Arc<dyn DomainProvider>>;

    /// List all registered provider ids
    async fn list_provider_ids(&self) -> Vec<String>;

    /// Provider responsible for a root, `None` when the root is not automated
    async fn resolve(&self, root: &DomainRoot) -> Option<Arc<dyn DomainProvider>> {
        if !root.uses_automation() {
            return None;
        }
        self.get(&root.provider).await
    }
}

/// In-memory Provider registry
#[derive(Clone)]
pub struct InMemoryProviderRegistry {
    providers: Arc<RwLock<HashMap<String, Arc<dyn DomainProvider>>>>,
}

impl InMemoryProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            providers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registry pre-filled with `providers`, keyed by their ids
    #[must_use]
    pub fn with_providers(providers: Vec<Arc<dyn DomainProvider>>) -> Self {
        let map = providers
            .into_iter()
            .map(|p| (p.id().to_string(), p))
            .collect();
        Self {
            providers: Arc::new(RwLock::new(map)),
        }
    }
}

impl Default for InMemoryProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderRegistry for InMemoryProviderRegistry {
    async fn register(&self, provider: Arc<dyn DomainProvider>) {
        self.providers
            .write()
            .await
            .insert(provider.id().to_string(), provider);
    }

    async fn unregister(&self, provider_id: &str) {
        self.providers.write().await.remove(provider_id);
    }

    async fn get(&self, provider_id: &str) -> Option<Arc<dyn DomainProvider>> {
        self.providers.read().await.get(provider_id).cloned()
    }

    async fn list_provider_ids(&self) -> Vec<String> {
        self.providers.read().await.keys().cloned().collect()
    }
}
