//! HTTP client for Azure Resource Manager.
//!
//! This module provides [`ArmClient`], the entry point every service crate
//! uses to talk to ARM. The client handles authentication, retries on
//! transient failures, automatic resource provider registration and the
//! first leg of long-running operations.
//!
//! # Examples
//!
//! ## Using a pre-acquired token
//! ```rust,no_run
//! use azure_mgmt_core::client::ArmClient;
//! use azure_mgmt_core::auth::ArmCredential;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArmClient::builder()
//!     .credential(ArmCredential::access_token("eyJ0eXAi..."))
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Using a custom TokenCredential
//! ```rust,no_run
//! use azure_mgmt_core::client::ArmClient;
//! use azure_mgmt_core::auth::ArmCredential;
//! use azure_identity::ClientSecretCredential;
//! use azure_core::credentials::Secret;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let credential = ClientSecretCredential::new(
//!     "tenant-id",
//!     "client-id".to_string(),
//!     Secret::new("client-secret"),
//!     None,
//! )?;
//!
//! let client = ArmClient::builder()
//!     .credential(ArmCredential::token_credential(credential))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use crate::auth::ArmCredential;
use crate::error::{ArmError, ArmResult};
use crate::models::ErrorResponse;
use crate::polling::{LongRunningResponse, Poller};
use crate::registration;
use reqwest::header::{HeaderMap, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client as HttpClient, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use std::time::Duration;

/// The public-cloud Resource Manager endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";

/// Environment variable consulted when no endpoint is given to the builder.
pub const ENDPOINT_ENV: &str = "AZURE_RESOURCE_MANAGER_ENDPOINT";

/// Default connection timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default read/response timeout (60 seconds).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Default interval between long-running operation polls (10 seconds).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default upper bound on a long-running operation (60 minutes).
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Upper bound for the exponential part of the retry backoff.
pub const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Determines if an HTTP status code represents a retriable error.
///
/// Retriable errors are transient server-side issues that may succeed on retry:
/// - 429 Too Many Requests (throttling)
/// - 500 Internal Server Error
/// - 502 Bad Gateway
/// - 503 Service Unavailable
/// - 504 Gateway Timeout
#[inline]
pub fn is_retriable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Read a `Retry-After` header expressed in seconds.
pub(crate) fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Configuration for automatic retry behavior on transient errors.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (not counting the initial request).
    pub max_retries: u32,
    /// Initial backoff duration before the first retry.
    /// Subsequent retries use exponential backoff (2^attempt * initial_backoff).
    /// A `Retry-After` header on the response takes precedence.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

/// Configuration for long-running operation polling.
#[derive(Debug, Clone)]
pub struct PollingPolicy {
    /// Interval used when the service does not send `Retry-After`.
    pub default_interval: Duration,
    /// Upper bound on the whole polling loop. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for PollingPolicy {
    fn default() -> Self {
        Self {
            default_interval: DEFAULT_POLL_INTERVAL,
            timeout: Some(DEFAULT_POLL_TIMEOUT),
        }
    }
}

/// The base client for interacting with Azure Resource Manager.
///
/// Service crates take a `&ArmClient` in every operation. The client is
/// cheaply cloneable and can be shared across threads.
#[derive(Debug, Clone)]
pub struct ArmClient {
    pub(crate) http: HttpClient,
    pub(crate) endpoint: Url,
    pub(crate) credential: ArmCredential,
    pub(crate) token_scope: String,
    pub(crate) retry_policy: RetryPolicy,
    pub(crate) polling_policy: PollingPolicy,
    pub(crate) auto_register_providers: bool,
}

/// Builder for constructing an [`ArmClient`].
///
/// Use [`ArmClient::builder()`] to create a new builder.
#[derive(Debug, Default)]
pub struct ArmClientBuilder {
    endpoint: Option<String>,
    credential: Option<ArmCredential>,
    token_scope: Option<String>,
    http_client: Option<HttpClient>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    retry_policy: Option<RetryPolicy>,
    polling_policy: Option<PollingPolicy>,
    skip_provider_registration: bool,
}

impl ArmClient {
    /// Create a new builder for configuring an `ArmClient`.
    pub fn builder() -> ArmClientBuilder {
        ArmClientBuilder::default()
    }

    /// Get the base endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Get the OAuth scope requested from token credentials.
    pub fn token_scope(&self) -> &str {
        &self.token_scope
    }

    /// Get the retry policy configuration.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Get the polling policy configuration.
    pub fn polling_policy(&self) -> &PollingPolicy {
        &self.polling_policy
    }

    /// Whether missing resource provider registrations are fixed automatically.
    pub fn auto_register_providers(&self) -> bool {
        self.auto_register_providers
    }

    /// Build a full URL for an API path.
    ///
    /// Absolute URLs, such as `nextLink` or polling URLs returned by the
    /// service, are used as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be joined to the endpoint URL.
    pub fn url(&self, path: &str) -> ArmResult<Url> {
        self.endpoint
            .join(path)
            .map_err(|e| ArmError::invalid_endpoint_with_source("failed to construct URL", e))
    }

    /// Build the URL of a resource from its ID and query parameters.
    ///
    /// Every segment of `resource_path` is percent-encoded on its own, so
    /// names containing characters such as `#`, `?` or spaces stay inside
    /// their segment. Query values are form-encoded.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot carry a path.
    pub fn resource_url(&self, resource_path: &str, query: &[(&str, &str)]) -> ArmResult<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| ArmError::InvalidEndpoint {
                message: format!("{} cannot be used as a base URL", self.endpoint),
                source: None,
            })?
            .pop_if_empty()
            .extend(resource_path.split('/').filter(|segment| !segment.is_empty()));

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Send a GET request.
    pub async fn get(&self, path: &str) -> ArmResult<reqwest::Response> {
        let url = self.url(path)?;
        self.send(Method::GET, url, None).await
    }

    /// Send a GET request and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ArmResult<T> {
        let response = self.get(path).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send a PUT request with a JSON body.
    pub async fn put<T: Serialize>(&self, path: &str, body: &T) -> ArmResult<reqwest::Response> {
        let url = self.url(path)?;
        let body = serde_json::to_value(body)?;
        self.send(Method::PUT, url, Some(&body)).await
    }

    /// Send a PATCH request with a JSON body.
    pub async fn patch<T: Serialize>(&self, path: &str, body: &T) -> ArmResult<reqwest::Response> {
        let url = self.url(path)?;
        let body = serde_json::to_value(body)?;
        self.send(Method::PATCH, url, Some(&body)).await
    }

    /// Send a POST request with an optional JSON body.
    pub async fn post<T: Serialize>(
        &self,
        path: &str,
        body: Option<&T>,
    ) -> ArmResult<reqwest::Response> {
        let url = self.url(path)?;
        let body = body.map(serde_json::to_value).transpose()?;
        self.send(Method::POST, url, body.as_ref()).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> ArmResult<reqwest::Response> {
        let url = self.url(path)?;
        self.send(Method::DELETE, url, None).await
    }

    /// Start a long-running operation and return a poller for it.
    ///
    /// The initial response decides how the operation is tracked; see
    /// [`Poller`].
    pub async fn send_long_running<T: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&T>,
    ) -> ArmResult<LongRunningResponse> {
        let url = self.url(path)?;
        let body = body.map(serde_json::to_value).transpose()?;
        let response = self.send(method.clone(), url.clone(), body.as_ref()).await?;
        Poller::from_response(self, &method, url, response).await
    }

    /// Send a request, registering the resource provider and retrying once if
    /// the subscription is not yet registered for it.
    pub(crate) async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> ArmResult<reqwest::Response> {
        let mut registered = false;

        loop {
            match self.send_with_retry(method.clone(), url.clone(), body).await {
                Err(err)
                    if self.auto_register_providers
                        && !registered
                        && registration::is_missing_registration(&err) =>
                {
                    let Some((subscription, namespace)) = registration::provider_from_url(&url)
                    else {
                        return Err(err);
                    };
                    tracing::warn!(
                        subscription_id = %subscription,
                        namespace = %namespace,
                        "resource provider not registered, registering"
                    );
                    registration::register_provider(self, &subscription, &namespace).await?;
                    registered = true;
                }
                other => return other,
            }
        }
    }

    /// Send a request with automatic retry on transient errors.
    ///
    /// Automatically adds the authorization header. Retries on retriable HTTP
    /// errors (429, 500, 502, 503, 504) with exponential backoff, or after the
    /// delay given by `Retry-After`.
    pub(crate) async fn send_with_retry(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> ArmResult<reqwest::Response> {
        let auth = self.credential.resolve(&self.token_scope).await?;

        for attempt in 0..=self.retry_policy.max_retries {
            let mut request = self
                .http
                .request(method.clone(), url.clone())
                .header(AUTHORIZATION, &auth);
            if let Some(body) = body {
                request = request.json(body);
            }
            let response = request.send().await?;

            let status = response.status().as_u16();

            // Success - return response
            if response.status().is_success() {
                return Ok(response);
            }

            // Non-retriable error or last attempt - return error
            if !is_retriable_status(status) || attempt == self.retry_policy.max_retries {
                return Self::check_response(response).await;
            }

            let backoff = self.backoff(attempt, retry_after(response.headers()));
            tracing::warn!(
                status,
                attempt,
                backoff_ms = backoff.as_millis() as u64,
                "transient error, retrying"
            );
            tokio::time::sleep(backoff).await;
        }

        unreachable!("retry loop should return before reaching here")
    }

    /// Backoff before retry `attempt`: `Retry-After` if the service sent one,
    /// otherwise exponential with ±25% jitter.
    fn backoff(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(delay) = retry_after {
            return delay;
        }
        let factor = 2_u32.checked_pow(attempt).unwrap_or(u32::MAX);
        let base_backoff = self
            .retry_policy
            .initial_backoff
            .checked_mul(factor)
            .map_or(MAX_BACKOFF, |backoff| backoff.min(MAX_BACKOFF));
        let jitter = 0.75 + fastrand::f64() * 0.5; // 0.75 to 1.25
        base_backoff.mul_f64(jitter)
    }

    /// Maximum length for error messages to prevent sensitive data leaks.
    const MAX_ERROR_MESSAGE_LEN: usize = 1000;

    /// Sanitize error messages by removing bearer tokens and SAS signatures.
    pub(crate) fn sanitize_error_message(msg: &str) -> String {
        let mut result = Self::redact_after(msg, "Bearer ");
        result = Self::redact_after(&result, "sig=");
        result
    }

    /// Replace the value following every occurrence of `marker` with `[REDACTED]`.
    fn redact_after(msg: &str, marker: &str) -> String {
        let mut result = msg.to_string();
        let mut search_start = 0;

        while search_start < result.len() {
            let Some(relative_pos) = result[search_start..].find(marker) else {
                break;
            };
            let value_start = search_start + relative_pos + marker.len();
            if value_start >= result.len() {
                break;
            }

            // Skip if already redacted
            if result[value_start..].starts_with("[REDACTED]") {
                search_start = value_start + 10;
                continue;
            }

            let value_end = result[value_start..]
                .find(|c: char| {
                    c.is_whitespace() || c == '"' || c == '\'' || c == ',' || c == '&'
                })
                .map(|pos| value_start + pos)
                .unwrap_or(result.len());

            if value_end > value_start {
                result.replace_range(value_start..value_end, "[REDACTED]");
                search_start = value_start + 10; // "[REDACTED]" is 10 chars
            } else {
                search_start = value_start;
            }
        }

        result
    }

    /// Truncate a message if it exceeds the maximum length.
    /// Also sanitizes sensitive data before truncating.
    pub(crate) fn truncate_message(msg: &str) -> String {
        let sanitized = Self::sanitize_error_message(msg);

        if sanitized.len() > Self::MAX_ERROR_MESSAGE_LEN {
            let mut end = Self::MAX_ERROR_MESSAGE_LEN;
            while !sanitized.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated)", &sanitized[..end])
        } else {
            sanitized
        }
    }

    /// Build an error from a failed response body.
    ///
    /// Understands both the `{"error": {...}}` envelope and the bare
    /// `{"code", "message"}` form some resource providers return.
    pub(crate) fn error_from_body(status: u16, body: &str) -> ArmError {
        if let Ok(envelope) = serde_json::from_str::<ErrorResponse>(body) {
            return ArmError::Api {
                status,
                code: envelope.error.code.unwrap_or_else(|| "unknown".into()),
                message: Self::truncate_message(envelope.error.message.as_deref().unwrap_or(body)),
            };
        }

        if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
            if let Some(code) = value.get("code").and_then(|c| c.as_str()) {
                return ArmError::Api {
                    status,
                    code: code.to_string(),
                    message: Self::truncate_message(
                        value
                            .get("message")
                            .and_then(|m| m.as_str())
                            .unwrap_or(body),
                    ),
                };
            }
        }

        ArmError::http(status, Self::truncate_message(body))
    }

    /// Check the response status and return an error if not successful.
    pub(crate) async fn check_response(
        response: reqwest::Response,
    ) -> ArmResult<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(Self::error_from_body(status, &body))
        }
    }
}

impl ArmClientBuilder {
    /// Set the Resource Manager endpoint URL.
    ///
    /// If not set, the builder checks the `AZURE_RESOURCE_MANAGER_ENDPOINT`
    /// environment variable and falls back to [`DEFAULT_ENDPOINT`].
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the credential to use for authentication.
    ///
    /// If not set, the builder uses [`ArmCredential::from_env()`].
    pub fn credential(mut self, credential: ArmCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Set the OAuth scope requested from token credentials.
    ///
    /// Defaults to `<endpoint>/.default`.
    pub fn token_scope(mut self, scope: impl Into<String>) -> Self {
        self.token_scope = Some(scope.into());
        self
    }

    /// Set a custom HTTP client.
    ///
    /// **Note:** If you provide a custom HTTP client, any timeout configuration
    /// via [`connect_timeout`](Self::connect_timeout) will be ignored.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout covering the whole request/response cycle.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the retry policy for transient errors.
    ///
    /// Defaults to 3 retries with 500ms initial backoff.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Set the polling policy for long-running operations.
    ///
    /// Defaults to a 10 second interval and a 60 minute timeout.
    pub fn polling_policy(mut self, policy: PollingPolicy) -> Self {
        self.polling_policy = Some(policy);
        self
    }

    /// Disable automatic registration of resource providers on
    /// `MissingSubscriptionRegistration` errors.
    pub fn skip_provider_registration(mut self) -> Self {
        self.skip_provider_registration = true;
        self
    }

    /// Build the `ArmClient`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The endpoint URL is invalid
    /// - The HTTP client cannot be constructed
    /// - Credential creation fails (when using environment-based credentials)
    pub fn build(self) -> ArmResult<ArmClient> {
        let http = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .connect_timeout(self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT))
                .timeout(self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT))
                .build()?,
        };

        let endpoint_str = self
            .endpoint
            .or_else(|| std::env::var(ENDPOINT_ENV).ok().filter(|v| !v.is_empty()))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let endpoint = Url::parse(&endpoint_str)
            .map_err(|e| ArmError::invalid_endpoint_with_source("invalid endpoint URL", e))?;

        if endpoint.cannot_be_a_base() {
            return Err(ArmError::InvalidEndpoint {
                message: format!("{endpoint_str} cannot be used as a base URL"),
                source: None,
            });
        }

        let token_scope = self
            .token_scope
            .unwrap_or_else(|| format!("{}/.default", endpoint.as_str().trim_end_matches('/')));

        let credential = match self.credential {
            Some(credential) => credential,
            None => ArmCredential::from_env()?,
        };

        Ok(ArmClient {
            http,
            endpoint,
            credential,
            token_scope,
            retry_policy: self.retry_policy.unwrap_or_default(),
            polling_policy: self.polling_policy.unwrap_or_default(),
            auto_register_providers: !self.skip_provider_registration,
        })
    }
}
