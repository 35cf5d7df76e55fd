//! Shared HTTP execution for providers.
//!
//! Providers build their own `RequestBuilder` (URL, auth, body); this module
//! sends it, classifies transport failures, logs the exchange and retries
//! transient failures.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::utils::backoff::retry_after_or_backoff;
use crate::utils::log_sanitizer::truncate_for_log;

/// Status code and body of a completed HTTP exchange.
#[derive(Debug)]
pub(crate) struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP helpers used by provider implementations.
pub(crate) struct HttpUtils;

impl HttpUtils {
    /// Send a request once.
    ///
    /// HTTP 429 becomes `RateLimited` and 502/503/504 become `NetworkError`
    /// so that [`execute_with_retry`](Self::execute_with_retry) can retry them;
    /// every other status is returned to the caller for envelope parsing.
    pub async fn execute(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url: &str,
    ) -> Result<HttpResponse, ProviderError> {
        log::debug!("[{provider_name}] {method_name} {url}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ProviderError::NetworkError {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        log::debug!("[{provider_name}] Response Status: {status}");

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{provider_name}] Response Body: {}",
            truncate_for_log(&body)
        );

        match status {
            429 => {
                log::warn!("[{provider_name}] Rate limited (HTTP 429), retry_after={retry_after:?}");
                Err(ProviderError::RateLimited {
                    provider: provider_name.to_string(),
                    retry_after,
                    raw_message: Some(body),
                })
            }
            502..=504 => {
                log::warn!("[{provider_name}] Upstream error (HTTP {status})");
                Err(ProviderError::NetworkError {
                    provider: provider_name.to_string(),
                    detail: format!("HTTP {status}: {}", truncate_for_log(&body)),
                })
            }
            _ => Ok(HttpResponse { status, body }),
        }
    }

    /// Send a request, retrying transient failures up to `max_retries` times.
    ///
    /// Only errors for which [`ProviderError::is_retryable`] holds are retried.
    /// Requests with streaming bodies cannot be cloned and are sent once.
    pub async fn execute_with_retry(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url: &str,
        max_retries: u32,
    ) -> Result<HttpResponse, ProviderError> {
        let mut attempt = 0;
        loop {
            let Some(request) = request_builder.try_clone() else {
                log::warn!("[{provider_name}] Cannot clone request, sending without retry");
                return Self::execute(request_builder, provider_name, method_name, url).await;
            };

            match Self::execute(request, provider_name, method_name, url).await {
                Err(e) if attempt < max_retries && e.is_retryable() => {
                    let retry_after = match &e {
                        ProviderError::RateLimited { retry_after, .. } => *retry_after,
                        _ => None,
                    };
                    let delay = retry_after_or_backoff(retry_after, attempt);
                    log::warn!(
                        "[{provider_name}] Request failed (attempt {}/{}), retrying in {:.1}s: {e}",
                        attempt + 1,
                        max_retries + 1,
                        delay.as_secs_f32(),
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// Parse a JSON body, logging the (truncated) raw text on failure.
    pub fn parse_json<T>(body: &str, provider_name: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(body).map_err(|e| {
            log::error!("[{provider_name}] JSON parse failed: {e}");
            log::error!("[{provider_name}] Raw response: {}", truncate_for_log(body));
            ProviderError::ParseError {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        })
    }
}
