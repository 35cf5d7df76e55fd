//! Provider shared helpers

use std::time::Duration;

use reqwest::Client;

use crate::error::{ProviderError, Result};

// ============ HTTP Client ============

/// Default connect timeout (seconds)
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds)
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Create an HTTP client with the default timeouts.
pub fn create_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("Failed to build configured HTTP client, using defaults: {e}");
            Client::new()
        })
}

// ============ Record types ============

/// Address record types a hostname can be provisioned as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressRecordType {
    A,
    Aaaa,
}

impl AddressRecordType {
    /// Upper-case record type as sent to provider APIs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
        }
    }

    /// Config key holding the origin address for this record type.
    pub fn origin_key(self) -> &'static str {
        match self {
            Self::A => "origin_ipv4",
            Self::Aaaa => "origin_ipv6",
        }
    }
}

/// Parse a configured record type (case-insensitive).
pub fn parse_address_record_type(record_type: &str, provider: &str) -> Result<AddressRecordType> {
    match record_type.trim().to_uppercase().as_str() {
        "A" => Ok(AddressRecordType::A),
        "AAAA" => Ok(AddressRecordType::Aaaa),
        _ => Err(ProviderError::InvalidParameter {
            provider: provider.to_string(),
            param: "record_type".to_string(),
            detail: format!("Unsupported record type for server domains: {record_type}"),
        }),
    }
}

// ============ Names ============

/// Strip a trailing dot and lower-case a hostname.
pub fn normalize_domain_name(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}
