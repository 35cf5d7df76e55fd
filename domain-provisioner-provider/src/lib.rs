//! # domain-provisioner-provider
//!
//! Provider abstraction for registering server hostnames with external DNS
//! services.
//!
//! A [`DomainProvider`] takes a [`ServerDomain`] and the [`DomainRoot`] it
//! lives under and creates whatever the service needs for the hostname to
//! resolve. Credentials and origin addresses come from
//! [`DomainRoot::provider_config`], so providers hold no per-root state.
//!
//! ## Supported Providers
//!
//! | Provider | Feature Flag | Auth Method |
//! |----------|-------------|-------------|
//! | [Cloudflare](https://www.cloudflare.com/) | `cloudflare` | Bearer Token |
//!
//! Roots with provider `manual` have no implementation; hostnames under them
//! are marked active without any API call.
//!
//! ## Feature Flags
//!
//! - **`all-providers`** *(default)*: enable every provider above.
//! - **`native-tls`** *(default)*: platform TLS.
//! - **`rustls`**: rustls, for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use domain_provisioner_provider::{DomainProvider, DomainRoot, ServerDomain, CloudflareProvider};
//!
//! # async fn example(domain: ServerDomain, root: DomainRoot) -> domain_provisioner_provider::Result<()> {
//! let provider = CloudflareProvider::new();
//! let response = provider.provision(&domain, &root).await?;
//! println!("verified: {}", response.verified);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`Result<T, ProviderError>`](ProviderError). The
//! `Display` text of the error is stored as the domain's failure reason.
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) are retried
//! with exponential backoff before they are returned.

mod error;
mod factory;
mod http_client;
mod providers;
#[cfg(test)]
mod test_server;
mod traits;
mod types;
mod utils;

pub use error::{ProviderError, Result};

pub use factory::{create_default_providers, get_all_provider_metadata};

// Internal traits (error mapping) are not exported
pub use traits::DomainProvider;

pub use types::{
    DomainProvisioningResponse, DomainRoot, DomainStatus, FieldType, ProviderConfigField,
    ProviderFeatures, ProviderMetadata, ProviderPayload, ProviderType, ServerDomain,
};

pub use utils::{backoff, datetime, log_sanitizer};

pub use providers::common::normalize_domain_name;

#[cfg(feature = "cloudflare")]
pub use providers::CloudflareProvider;
