//! Cloudflare API types

use serde::{Deserialize, Serialize};

/// Cloudflare API response envelope
#[derive(Debug, Deserialize)]
pub struct CloudflareResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub errors: Vec<CloudflareError>,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareError {
    pub code: i64,
    pub message: String,
}

/// DNS record as returned by the API
#[derive(Debug, Deserialize)]
pub struct CloudflareDnsRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub proxied: Option<bool>,
}

/// `POST /zones/{zone_id}/dns_records` body
#[derive(Debug, Serialize)]
pub struct CreateRecordBody {
    #[serde(rename = "type")]
    pub record_type: &'static str,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    pub proxied: bool,
}
