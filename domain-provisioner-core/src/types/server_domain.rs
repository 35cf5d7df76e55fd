//! Server domain request types

use serde::{Deserialize, Serialize};

use domain_provisioner_provider::DomainStatus;

/// Binding type used when a request does not name one.
pub const DEFAULT_DOMAIN_TYPE: &str = "managed";

/// The hosted server a hostname is requested for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRef {
    pub id: i64,
    /// Short server identifier, used as the subdomain when none is requested.
    pub uuid_short: String,
}

/// A user's request to bind a hostname to a server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRequest {
    pub root_id: Option<i64>,
    pub subdomain: Option<String>,
    #[serde(rename = "type")]
    pub domain_type: Option<String>,
    pub verification_method: Option<String>,
    pub verification_token: Option<String>,
}

/// Insert form of a server domain; the repository assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewServerDomain {
    pub server_id: i64,
    pub domain_root_id: Option<i64>,
    pub domain_type: String,
    pub hostname: String,
    pub subdomain: Option<String>,
    pub status: DomainStatus,
    pub verification_method: Option<String>,
    pub verification_token: Option<String>,
}
