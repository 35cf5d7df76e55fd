use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{DomainProvisioningResponse, DomainRoot, ProviderMetadata, ServerDomain};

/// Raw API error (internal)
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// Error code, format differs per provider
    pub code: Option<String>,
    /// Original error message
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Extra information available while mapping an error (internal)
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Hostname being provisioned (for `RecordExists`)
    pub hostname: Option<String>,
    /// Zone identifier (for `ZoneNotFound`)
    pub zone: Option<String>,
}

/// Maps raw provider API errors onto [`ProviderError`] (internal)
pub(crate) trait ProviderErrorMapper {
    /// Provider identifier
    fn provider_name(&self) -> &'static str;

    /// Map a raw API error to the unified error type
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// Shortcut: parse error
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// Shortcut: missing configuration on the domain root
    fn missing_config(&self, field: &str, detail: impl Into<String>) -> ProviderError {
        ProviderError::MissingConfiguration {
            provider: self.provider_name().to_string(),
            field: field.to_string(),
            detail: detail.into(),
        }
    }

    /// Shortcut: unknown error (fallback)
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Domain provisioning capability.
///
/// Implementations register a hostname with an external DNS service. A failed
/// call is turned into a `ServerDomainProvisionFailed` event by the caller,
/// with the error's `Display` text as the reason. Idempotency is up to the
/// provider.
#[async_trait]
pub trait DomainProvider: Send + Sync {
    /// Provider identifier, matching `DomainRoot::provider`.
    fn id(&self) -> &'static str;

    /// Static provider metadata (config fields, features).
    fn metadata() -> ProviderMetadata
    where
        Self: Sized;

    /// Provision `domain` under `root`.
    async fn provision(
        &self,
        domain: &ServerDomain,
        root: &DomainRoot,
    ) -> Result<DomainProvisioningResponse>;
}
