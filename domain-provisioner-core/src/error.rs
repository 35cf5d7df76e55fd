//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

pub use domain_provisioner_provider::ProviderError;

use crate::types::DomainStatus;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Server domain not found
    #[error("Server domain not found: {0}")]
    DomainNotFound(i64),

    /// Domain root not found
    #[error("Domain root not found: {0}")]
    DomainRootNotFound(i64),

    /// Root is missing or deactivated when a hostname is requested
    #[error("The selected root domain is no longer available.")]
    DomainRootUnavailable,

    /// Another server domain already uses the hostname
    #[error("The requested hostname is already in use: {0}")]
    HostnameInUse(String),

    /// Lifecycle transition not allowed from the current status
    #[error("Cannot move server domain from {from} to {to}")]
    InvalidTransition { from: DomainStatus, to: DomainStatus },

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Query parameter outside its allowed range
    #[error("Query value for {parameter} must be between {min} and {max}")]
    QueryValueOutOfRange {
        parameter: String,
        min: u64,
        max: u64,
    },

    /// Provisioning queue no longer accepts jobs
    #[error("Provisioning queue is closed")]
    QueueClosed,

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether this is expected behavior (user input, missing records, ...), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Update this method when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::DomainNotFound(_)
            | Self::DomainRootNotFound(_)
            | Self::DomainRootUnavailable
            | Self::HostnameInUse(_)
            | Self::InvalidTransition { .. }
            | Self::ValidationError(_)
            | Self::QueryValueOutOfRange { .. } => true,
            Self::Provider(e) => e.is_expected(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
