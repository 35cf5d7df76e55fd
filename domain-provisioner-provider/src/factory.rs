//! Provider construction and metadata.

use std::sync::Arc;

use crate::traits::DomainProvider;
use crate::types::ProviderMetadata;

#[cfg(feature = "cloudflare")]
use crate::providers::CloudflareProvider;

/// One instance of every provider compiled into this build.
///
/// Providers read their credentials from each domain root, so a single
/// shared instance per provider is enough. The caller registers these in its
/// provider registry under [`DomainProvider::id`].
///
/// ```rust,no_run
/// use domain_provisioner_provider::create_default_providers;
///
/// for provider in create_default_providers() {
///     println!("{}", provider.id());
/// }
/// ```
pub fn create_default_providers() -> Vec<Arc<dyn DomainProvider>> {
    #[allow(unused_mut)]
    let mut providers: Vec<Arc<dyn DomainProvider>> = Vec::new();
    #[cfg(feature = "cloudflare")]
    providers.push(Arc::new(CloudflareProvider::new()));
    providers
}

/// Metadata for every automated provider compiled into this build.
///
/// `manual` is not listed: it has no configuration and no implementation.
pub fn get_all_provider_metadata() -> Vec<ProviderMetadata> {
    vec![
        #[cfg(feature = "cloudflare")]
        CloudflareProvider::metadata(),
    ]
}
