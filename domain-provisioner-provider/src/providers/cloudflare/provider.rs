//! Cloudflare `DomainProvider` implementation

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use crate::error::{ProviderError, Result};
use crate::providers::common::{normalize_domain_name, parse_address_record_type};
use crate::traits::{DomainProvider, ErrorContext, ProviderErrorMapper};
use crate::types::{
    DomainProvisioningResponse, DomainRoot, FieldType, ProviderConfigField, ProviderFeatures,
    ProviderMetadata, ProviderType, ServerDomain,
};

use super::{CloudflareDnsRecord, CloudflareProvider, CreateRecordBody, DEFAULT_TTL};

/// Settings read from a domain root's `provider_config`.
#[derive(Debug)]
struct RootSettings {
    zone_id: String,
    api_token: String,
    record_type: &'static str,
    origin: String,
    ttl: u32,
    proxied: bool,
}

impl CloudflareProvider {
    fn root_settings(&self, root: &DomainRoot) -> Result<RootSettings> {
        let zone_id = root.provider_option_str("zone_id").filter(|v| !v.is_empty());
        let api_token = root.provider_option_str("api_token").filter(|v| !v.is_empty());
        let (Some(zone_id), Some(api_token)) = (zone_id, api_token) else {
            return Err(self.missing_config(
                "zone_id, api_token",
                "Cloudflare credentials are not configured for this domain root.",
            ));
        };

        let record_type = root
            .provider_option_str("record_type")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "A".to_string());
        let record_type = parse_address_record_type(&record_type, self.provider_name())?;

        let origin = root
            .provider_option_str(record_type.origin_key())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                self.missing_config(
                    record_type.origin_key(),
                    "Cloudflare origin address is missing in provider configuration.",
                )
            })?;

        Ok(RootSettings {
            zone_id,
            api_token,
            record_type: record_type.as_str(),
            origin,
            ttl: root.provider_option_u32("ttl", DEFAULT_TTL),
            proxied: root.provider_option_bool("proxied", true),
        })
    }

    fn record_payload(record: CloudflareDnsRecord) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert(
            "cloudflare".to_string(),
            json!({
                "id": record.id,
                "type": record.record_type,
                "name": record.name,
                "content": record.content,
                "proxied": record.proxied,
            }),
        );
        payload
    }

    /// Look for a record created by an earlier attempt whose answer was lost.
    ///
    /// Returns the record only when its type and content match what was requested.
    async fn find_matching_record(
        &self,
        path: &str,
        settings: &RootSettings,
        hostname: &str,
        context: ErrorContext,
    ) -> Result<Option<CloudflareDnsRecord>> {
        let records: Vec<CloudflareDnsRecord> = self
            .get(
                path,
                &settings.api_token,
                &[("type", settings.record_type), ("name", hostname)],
                context,
            )
            .await?;

        Ok(records.into_iter().find(|record| {
            record.record_type.eq_ignore_ascii_case(settings.record_type)
                && normalize_domain_name(&record.name) == hostname
                && record.content == settings.origin
        }))
    }
}

#[async_trait]
impl DomainProvider for CloudflareProvider {
    fn id(&self) -> &'static str {
        ProviderType::Cloudflare.as_str()
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Cloudflare,
            name: "Cloudflare".to_string(),
            description: "Creates proxied DNS records in a Cloudflare zone".to_string(),
            config_fields: vec![
                ProviderConfigField {
                    key: "zone_id".to_string(),
                    label: "Zone ID".to_string(),
                    field_type: FieldType::Text,
                    required: true,
                    placeholder: Some("023e105f4ecef8ad9ca31a8372d0c353".to_string()),
                    help_text: Some("Shown on the zone's overview page".to_string()),
                },
                ProviderConfigField {
                    key: "api_token".to_string(),
                    label: "API Token".to_string(),
                    field_type: FieldType::Password,
                    required: true,
                    placeholder: None,
                    help_text: Some("Token with Zone.DNS edit permission".to_string()),
                },
                ProviderConfigField {
                    key: "record_type".to_string(),
                    label: "Record Type".to_string(),
                    field_type: FieldType::Text,
                    required: false,
                    placeholder: Some("A".to_string()),
                    help_text: Some("A or AAAA".to_string()),
                },
                ProviderConfigField {
                    key: "origin_ipv4".to_string(),
                    label: "Origin IPv4".to_string(),
                    field_type: FieldType::Text,
                    required: false,
                    placeholder: Some("203.0.113.10".to_string()),
                    help_text: Some("Required for A records".to_string()),
                },
                ProviderConfigField {
                    key: "origin_ipv6".to_string(),
                    label: "Origin IPv6".to_string(),
                    field_type: FieldType::Text,
                    required: false,
                    placeholder: Some("2001:db8::10".to_string()),
                    help_text: Some("Required for AAAA records".to_string()),
                },
                ProviderConfigField {
                    key: "ttl".to_string(),
                    label: "TTL".to_string(),
                    field_type: FieldType::Number,
                    required: false,
                    placeholder: Some(DEFAULT_TTL.to_string()),
                    help_text: None,
                },
                ProviderConfigField {
                    key: "proxied".to_string(),
                    label: "Proxied".to_string(),
                    field_type: FieldType::Boolean,
                    required: false,
                    placeholder: None,
                    help_text: Some("Route traffic through Cloudflare (default on)".to_string()),
                },
            ],
            features: ProviderFeatures { proxy: true },
        }
    }

    async fn provision(
        &self,
        domain: &ServerDomain,
        root: &DomainRoot,
    ) -> Result<DomainProvisioningResponse> {
        let settings = self.root_settings(root)?;
        let hostname = normalize_domain_name(&domain.hostname);

        log::info!(
            "[{}] Creating {} record for {hostname} in zone {}",
            self.provider_name(),
            settings.record_type,
            settings.zone_id
        );

        let body = CreateRecordBody {
            record_type: settings.record_type,
            name: hostname.clone(),
            content: settings.origin.clone(),
            ttl: settings.ttl,
            proxied: settings.proxied,
        };
        let path = format!(
            "/zones/{}/dns_records",
            urlencoding::encode(&settings.zone_id)
        );
        let context = ErrorContext {
            hostname: Some(hostname.clone()),
            zone: Some(settings.zone_id.clone()),
        };

        let created: Result<CloudflareDnsRecord> = self
            .post(&path, &settings.api_token, &body, context.clone())
            .await;

        let record = match created {
            Ok(record) => record,
            // A retried POST can land after the first one already created the record.
            Err(err @ ProviderError::RecordExists { .. }) => {
                match self
                    .find_matching_record(&path, &settings, &hostname, context)
                    .await
                {
                    Ok(Some(record)) => {
                        log::info!(
                            "[{}] Reusing existing record {} for {hostname}",
                            self.provider_name(),
                            record.id
                        );
                        record
                    }
                    Ok(None) => return Err(err),
                    Err(lookup_err) => {
                        log::warn!(
                            "[{}] Could not look up existing record for {hostname}: {lookup_err}",
                            self.provider_name()
                        );
                        return Err(err);
                    }
                }
            }
            Err(err) => return Err(err),
        };

        Ok(DomainProvisioningResponse::verified(Self::record_payload(
            record,
        )))
    }
}
