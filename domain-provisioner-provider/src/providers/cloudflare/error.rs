//! Cloudflare error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::CloudflareProvider;

/// Cloudflare error codes seen when creating DNS records.
/// Reference: <https://developers.cloudflare.com/api/operations/dns-records-for-a-zone-create-dns-record>
impl ProviderErrorMapper for CloudflareProvider {
    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            // 6003/6103/6111: malformed auth headers
            // 9109: max auth failures / unauthorized
            // 10000: authentication error
            Some("6003" | "6103" | "6111" | "9109" | "10000") => {
                ProviderError::InvalidCredentials {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(raw.message),
                }
            }

            // 10001: token lacks the DNS edit permission for this zone
            Some("10001") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // 1004: DNS validation error
            // 9000: invalid name
            // 9005/9006: origin is not a valid IPv4/IPv6 address
            // 9021: invalid TTL
            // 9041: record cannot be proxied
            Some(code @ ("1004" | "9000" | "9005" | "9006" | "9021" | "9041")) => {
                let param = match code {
                    "9000" => "name",
                    "9005" | "9006" => "content",
                    "9021" => "ttl",
                    "9041" => "proxied",
                    _ => "general",
                };
                ProviderError::InvalidParameter {
                    provider: self.provider_name().to_string(),
                    param: param.to_string(),
                    detail: raw.message,
                }
            }

            // 81053..81058: a record with that host already exists
            Some("81053" | "81054" | "81055" | "81056" | "81057" | "81058") => {
                ProviderError::RecordExists {
                    provider: self.provider_name().to_string(),
                    record_name: context.hostname.unwrap_or_else(|| "<unknown>".to_string()),
                    raw_message: Some(raw.message),
                }
            }

            // 81045: record quota exceeded
            Some("81045") => ProviderError::QuotaExceeded {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // 7000: no route for that URI
            // 7003: could not route to zone (bad zone id)
            Some("7000" | "7003") => ProviderError::ZoneNotFound {
                provider: self.provider_name().to_string(),
                zone: context.zone.unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            _ => self.unknown_error(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> CloudflareProvider {
        CloudflareProvider::new()
    }

    fn ctx() -> ErrorContext {
        ErrorContext {
            hostname: Some("alpha.play.example.com".to_string()),
            zone: Some("zone-1".to_string()),
        }
    }

    #[test]
    fn auth_codes_map_to_invalid_credentials() {
        for code in ["6003", "9109", "10000"] {
            let err = provider().map_error(RawApiError::with_code(code, "denied"), ctx());
            assert!(
                matches!(err, ProviderError::InvalidCredentials { .. }),
                "code {code} mapped to {err:?}"
            );
        }
    }

    #[test]
    fn duplicate_record_carries_hostname() {
        let err = provider().map_error(RawApiError::with_code("81057", "exists"), ctx());
        assert_eq!(
            err,
            ProviderError::RecordExists {
                provider: "cloudflare".to_string(),
                record_name: "alpha.play.example.com".to_string(),
                raw_message: Some("exists".to_string()),
            }
        );
    }

    #[test]
    fn bad_zone_carries_zone_id() {
        let err = provider().map_error(RawApiError::with_code("7003", "no route"), ctx());
        assert!(matches!(err, ProviderError::ZoneNotFound { zone, .. } if zone == "zone-1"));
    }

    #[test]
    fn invalid_origin_names_content_param() {
        let err = provider().map_error(RawApiError::with_code("9005", "bad ip"), ctx());
        assert!(
            matches!(err, ProviderError::InvalidParameter { param, .. } if param == "content")
        );
    }

    #[test]
    fn uncoded_error_is_unknown() {
        let err = provider().map_error(RawApiError::new("something broke"), ctx());
        assert!(matches!(
            err,
            ProviderError::Unknown { raw_code: None, raw_message, .. } if raw_message == "something broke"
        ));
    }
}
