//! Cloudflare HTTP requests

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::{CloudflareProvider, CloudflareResponse, MAX_RETRIES};

impl CloudflareProvider {
    /// POST a JSON body and unwrap the Cloudflare envelope.
    pub(crate) async fn post<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        path: &str,
        api_token: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<T> {
        let url = format!("{}{path}", self.api_base);
        let body_json = serde_json::to_string(body).map_err(|e| ProviderError::SerializationError {
            provider: self.provider_name().to_string(),
            detail: e.to_string(),
        })?;
        log::debug!(
            "[{}] Request Body: {}",
            self.provider_name(),
            truncate_for_log(&body_json)
        );

        let request = self
            .client
            .post(&url)
            .bearer_auth(api_token)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .body(body_json);

        let response =
            HttpUtils::execute_with_retry(request, self.provider_name(), "POST", &url, MAX_RETRIES)
                .await?;

        self.unwrap_envelope(response.status, &response.body, context)
    }

    /// GET a path with query parameters and unwrap the Cloudflare envelope.
    pub(crate) async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        api_token: &str,
        query: &[(&str, &str)],
        context: ErrorContext,
    ) -> Result<T> {
        let url = format!("{}{path}", self.api_base);
        let request = self
            .client
            .get(&url)
            .query(query)
            .bearer_auth(api_token)
            .header("Accept", "application/json");

        let response =
            HttpUtils::execute_with_retry(request, self.provider_name(), "GET", &url, MAX_RETRIES)
                .await?;

        self.unwrap_envelope(response.status, &response.body, context)
    }

    fn unwrap_envelope<T: for<'de> Deserialize<'de>>(
        &self,
        status: u16,
        body: &str,
        context: ErrorContext,
    ) -> Result<T> {
        let envelope: CloudflareResponse<T> = match HttpUtils::parse_json(body, self.provider_name())
        {
            Ok(envelope) => envelope,
            Err(e) => return Err(self.status_error(status).unwrap_or(e)),
        };

        if !envelope.success {
            let raw = envelope.errors.first().map_or_else(
                || RawApiError::new(format!("Cloudflare API error (HTTP {status})")),
                |e| RawApiError::with_code(e.code.to_string(), e.message.clone()),
            );
            log::error!("[{}] API error: {}", self.provider_name(), raw.message);
            return Err(self.map_error(raw, context));
        }

        envelope
            .result
            .ok_or_else(|| self.parse_error("Response is missing the result field"))
    }

    /// Error for an auth failure whose body was not a Cloudflare envelope.
    fn status_error(&self, status: u16) -> Option<ProviderError> {
        match status {
            401 => Some(ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: None,
            }),
            403 => Some(ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: None,
            }),
            _ => None,
        }
    }
}
