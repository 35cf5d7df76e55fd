//! Cloudflare domain provider

mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::providers::common::create_http_client;

pub(crate) use types::{CloudflareDnsRecord, CloudflareResponse, CreateRecordBody};

pub(crate) const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";
/// Retries for transient failures (network, timeout, 429, 502-504)
pub(crate) const MAX_RETRIES: u32 = 2;
/// Default record TTL in seconds
pub(crate) const DEFAULT_TTL: u32 = 120;

/// Cloudflare domain provider.
///
/// Stateless apart from the HTTP client: zone, token and origin are read from
/// each `DomainRoot::provider_config`, so one instance serves every root.
pub struct CloudflareProvider {
    pub(crate) client: Client,
    pub(crate) api_base: String,
}

impl CloudflareProvider {
    pub fn new() -> Self {
        Self::with_client(create_http_client(), CF_API_BASE)
    }

    /// Use a custom client and API base URL (proxies, test servers).
    pub fn with_client(client: Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for CloudflareProvider {
    fn default() -> Self {
        Self::new()
    }
}
