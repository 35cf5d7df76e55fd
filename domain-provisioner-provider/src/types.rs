use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque provider data stored alongside a server domain (a JSON object).
pub type ProviderPayload = Map<String, Value>;

// ============ Provider Types ============

/// Identifies how a domain root is provisioned.
///
/// `Manual` roots have no automation: hostnames under them are marked active
/// without calling any external API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// No automation, DNS is managed by hand.
    Manual,
    /// Cloudflare DNS. Requires feature `cloudflare`.
    #[cfg(feature = "cloudflare")]
    Cloudflare,
}

impl ProviderType {
    /// Identifier stored in `domain_roots.provider`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            #[cfg(feature = "cloudflare")]
            Self::Cloudflare => "cloudflare",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            #[cfg(feature = "cloudflare")]
            "cloudflare" => Ok(Self::Cloudflare),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

// ============ Domain Types ============

/// Lifecycle status of a server domain.
///
/// Stored as lowercase strings. Transitions only move forward
/// (`pending -> provisioning -> active | error`), except that a failed
/// domain may be re-requested (`error -> pending`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    /// Requested, waiting for the provisioning job.
    #[default]
    Pending,
    /// The provider call is in flight.
    Provisioning,
    /// Provisioned (or bound under a manual root).
    Active,
    /// Provisioning failed; see `provider_payload.last_error`.
    Error,
    /// Administratively disabled.
    Disabled,
}

impl DomainStatus {
    /// Persisted string value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Provisioning => "provisioning",
            Self::Active => "active",
            Self::Error => "error",
            Self::Disabled => "disabled",
        }
    }

    /// Whether moving from `self` to `next` is a legal lifecycle transition.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (
                Self::Pending,
                Self::Provisioning | Self::Active | Self::Error | Self::Disabled
            ) | (
                Self::Provisioning,
                Self::Active | Self::Error | Self::Disabled
            ) | (Self::Active | Self::Error, Self::Disabled)
                | (Self::Error, Self::Pending)
        )
    }

    /// Whether a provisioning job may still act on a domain in this status.
    pub fn is_provisionable(self) -> bool {
        matches!(self, Self::Pending | Self::Provisioning)
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DomainStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "provisioning" => Ok(Self::Provisioning),
            "active" => Ok(Self::Active),
            "error" => Ok(Self::Error),
            "disabled" => Ok(Self::Disabled),
            other => Err(format!("unknown domain status: {other}")),
        }
    }
}

/// A hostname bound to a hosted server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerDomain {
    pub id: i64,
    pub server_id: i64,
    pub domain_root_id: Option<i64>,
    /// Binding type, `"managed"` unless the request says otherwise.
    #[serde(rename = "type")]
    pub domain_type: String,
    /// Fully-qualified hostname, unique across all domains.
    pub hostname: String,
    pub subdomain: Option<String>,
    pub status: DomainStatus,
    pub verification_method: Option<String>,
    pub verification_token: Option<String>,
    #[serde(default, with = "crate::utils::datetime::option")]
    pub verified_at: Option<DateTime<Utc>>,
    pub provider_payload: Option<ProviderPayload>,
    #[serde(default, with = "crate::utils::datetime::option")]
    pub last_synced_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::utils::datetime")]
    pub updated_at: DateTime<Utc>,
}

impl ServerDomain {
    /// The failure reason recorded by the last failed provisioning attempt.
    pub fn last_error(&self) -> Option<&str> {
        self.provider_payload
            .as_ref()
            .and_then(|p| p.get("last_error"))
            .and_then(Value::as_str)
    }
}

/// The parent zone under which server domains are created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRoot {
    pub id: i64,
    pub name: String,
    /// Zone apex, e.g. `play.example.com`. Unique across roots.
    pub root_domain: String,
    /// Provider identifier; unknown values behave like `manual`.
    pub provider: String,
    #[serde(default)]
    pub provider_config: Map<String, Value>,
    pub is_active: bool,
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::utils::datetime")]
    pub updated_at: DateTime<Utc>,
}

impl DomainRoot {
    /// Raw provider configuration value.
    pub fn provider_option(&self, key: &str) -> Option<&Value> {
        self.provider_config.get(key).filter(|v| !v.is_null())
    }

    /// Provider configuration value as a non-empty string.
    ///
    /// Numbers and booleans are rendered, so `zone_id = 42` reads as `"42"`.
    pub fn provider_option_str(&self, key: &str) -> Option<String> {
        match self.provider_option(key)? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Provider configuration value as an unsigned integer, accepting numeric strings.
    pub fn provider_option_u32(&self, key: &str, default: u32) -> u32 {
        match self.provider_option(key) {
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Provider configuration value as a boolean, accepting `"true"`/`"1"` style strings.
    pub fn provider_option_bool(&self, key: &str, default: bool) -> bool {
        match self.provider_option(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64().map_or(default, |v| v != 0),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" | "" => false,
                _ => default,
            },
            _ => default,
        }
    }

    /// Whether hostnames under this root are provisioned through an external API.
    pub fn uses_automation(&self) -> bool {
        self.provider != ProviderType::Manual.as_str()
    }
}

// ============ Provisioning Types ============

/// Outcome of a successful [`DomainProvider::provision`](crate::DomainProvider::provision) call.
///
/// Not persisted on its own; the provisioning job copies it onto the
/// [`ServerDomain`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainProvisioningResponse {
    /// Provider-specific data (record ids, etc).
    pub provider_payload: ProviderPayload,
    /// Whether the provider confirmed the hostname.
    pub verified: bool,
    #[serde(default, with = "crate::utils::datetime::option")]
    pub verified_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::utils::datetime")]
    pub synced_at: DateTime<Utc>,
}

impl DomainProvisioningResponse {
    /// Build a response, filling in timestamps the provider did not report.
    ///
    /// - `verified_at` defaults to now when `verified` is set.
    /// - `synced_at` always defaults to now.
    pub fn new(
        provider_payload: ProviderPayload,
        verified: bool,
        verified_at: Option<DateTime<Utc>>,
        synced_at: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        let verified_at = match verified_at {
            Some(at) => Some(at),
            None if verified => Some(now),
            None => None,
        };

        Self {
            provider_payload,
            verified,
            verified_at,
            synced_at: synced_at.unwrap_or(now),
        }
    }

    /// A verified response stamped with the current time.
    pub fn verified(provider_payload: ProviderPayload) -> Self {
        Self::new(provider_payload, true, None, None)
    }
}

// ============ Provider Metadata ============

/// Input type for a provider configuration field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Plain text input.
    Text,
    /// Masked/password input.
    Password,
    /// Numeric input.
    Number,
    /// Checkbox.
    Boolean,
}

/// A single key a provider reads from `DomainRoot::provider_config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigField {
    /// Config key, e.g. `"zone_id"`.
    pub key: String,
    /// Human-readable label.
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether provisioning fails without it.
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

/// Provider-specific feature support flags.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFeatures {
    /// Whether the provider supports CDN proxying of records.
    pub proxy: bool,
}

/// Static metadata describing an automated provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetadata {
    pub id: ProviderType,
    pub name: String,
    pub description: String,
    pub config_fields: Vec<ProviderConfigField>,
    pub features: ProviderFeatures,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn root_with(config: Value) -> DomainRoot {
        let Value::Object(provider_config) = config else {
            unreachable!("test config must be an object");
        };
        DomainRoot {
            id: 1,
            name: "Play".to_string(),
            root_domain: "play.example.com".to_string(),
            provider: "cloudflare".to_string(),
            provider_config,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn verified_response_defaults_verified_at_to_now() {
        let before = Utc::now();
        let resp = DomainProvisioningResponse::new(Map::new(), true, None, None);
        let after = Utc::now();

        let verified_at = resp.verified_at.expect("verified_at should be set");
        assert!(verified_at >= before && verified_at <= after);
        assert!(resp.synced_at >= before && resp.synced_at <= after);
    }

    #[test]
    fn unverified_response_leaves_verified_at_empty() {
        let resp = DomainProvisioningResponse::new(Map::new(), false, None, None);
        assert!(resp.verified_at.is_none());
    }

    #[test]
    fn synced_at_defaults_regardless_of_verification() {
        let before = Utc::now();
        let unverified = DomainProvisioningResponse::new(Map::new(), false, None, None);
        let verified = DomainProvisioningResponse::new(Map::new(), true, None, None);

        assert!(unverified.synced_at >= before);
        assert!(verified.synced_at >= before);
    }

    #[test]
    fn explicit_timestamps_are_kept() {
        let at = DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp");
        let resp = DomainProvisioningResponse::new(Map::new(), true, Some(at), Some(at));
        assert_eq!(resp.verified_at, Some(at));
        assert_eq!(resp.synced_at, at);
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            DomainStatus::Pending,
            DomainStatus::Provisioning,
            DomainStatus::Active,
            DomainStatus::Error,
            DomainStatus::Disabled,
        ] {
            assert_eq!(status.as_str().parse::<DomainStatus>(), Ok(status));
        }
        assert!("unprovisioned".parse::<DomainStatus>().is_err());
    }

    #[test]
    fn transitions_are_monotonic_except_retry() {
        use DomainStatus::{Active, Disabled, Error, Pending, Provisioning};

        assert!(Pending.can_transition_to(Provisioning));
        assert!(Provisioning.can_transition_to(Active));
        assert!(Provisioning.can_transition_to(Error));
        assert!(Error.can_transition_to(Pending));

        assert!(!Active.can_transition_to(Pending));
        assert!(!Active.can_transition_to(Error));
        assert!(!Error.can_transition_to(Active));
        assert!(!Provisioning.can_transition_to(Pending));
        assert!(!Disabled.can_transition_to(Pending));
    }

    #[test]
    fn provider_options_are_coerced() {
        let root = root_with(json!({
            "zone_id": 42,
            "api_token": "",
            "ttl": "300",
            "proxied": "false",
            "origin_ipv4": null,
        }));

        assert_eq!(root.provider_option_str("zone_id").as_deref(), Some("42"));
        assert_eq!(root.provider_option_str("api_token"), None);
        assert_eq!(root.provider_option_str("origin_ipv4"), None);
        assert_eq!(root.provider_option_u32("ttl", 120), 300);
        assert_eq!(root.provider_option_u32("missing", 120), 120);
        assert!(!root.provider_option_bool("proxied", true));
        assert!(root.provider_option_bool("missing", true));
    }

    #[test]
    fn manual_root_has_no_automation() {
        let mut root = root_with(json!({}));
        assert!(root.uses_automation());
        root.provider = "manual".to_string();
        assert!(!root.uses_automation());
    }

    #[test]
    fn last_error_reads_payload() {
        let mut payload = Map::new();
        payload.insert("last_error".to_string(), json!("dns lookup timeout"));
        let domain = ServerDomain {
            id: 7,
            server_id: 3,
            domain_root_id: Some(1),
            domain_type: "managed".to_string(),
            hostname: "beta.example.com".to_string(),
            subdomain: Some("beta".to_string()),
            status: DomainStatus::Error,
            verification_method: None,
            verification_token: None,
            verified_at: None,
            provider_payload: Some(payload),
            last_synced_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(domain.last_error(), Some("dns lookup timeout"));
    }
}
