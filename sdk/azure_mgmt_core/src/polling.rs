//! Long-running operation polling.
//!
//! Mutating ARM calls often return before the change is complete. How the
//! caller tracks completion depends on the initial response, checked in this
//! order:
//!
//! 1. an `Azure-AsyncOperation` header: poll that URL and read `status`
//!    from its body;
//! 2. a `Location` header: poll that URL until it stops answering
//!    `202 Accepted`;
//! 3. for `PUT`/`PATCH`, a non-terminal `properties.provisioningState` in the
//!    body: poll the resource itself until the state is terminal;
//! 4. otherwise the operation finished synchronously.
//!
//! Every poll honors `Retry-After`, falling back to the client's
//! [`PollingPolicy`](crate::client::PollingPolicy) interval.

use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderMap, LOCATION};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::client::{retry_after, ArmClient};
use crate::error::{ArmError, ArmResult};
use crate::models::ErrorDetail;

/// Header carrying the operation status URL.
pub const AZURE_ASYNC_OPERATION: &str = "Azure-AsyncOperation";

/// Progress of a long-running operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollingStatus {
    InProgress,
    Succeeded,
    Failed,
    Canceled,
}

impl PollingStatus {
    /// Map a `status` or `provisioningState` value, ignoring case.
    ///
    /// Anything other than a known terminal state means still in progress.
    pub fn from_state(state: &str) -> Self {
        if state.eq_ignore_ascii_case("Succeeded") {
            Self::Succeeded
        } else if state.eq_ignore_ascii_case("Failed") {
            Self::Failed
        } else if state.eq_ignore_ascii_case("Canceled") || state.eq_ignore_ascii_case("Cancelled") {
            Self::Canceled
        } else {
            Self::InProgress
        }
    }

    /// Whether the operation has stopped.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl fmt::Display for PollingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InProgress => "InProgress",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Canceled => "Canceled",
        })
    }
}

/// How a [`Poller`] tracks its operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollingStrategy {
    /// Poll the `Azure-AsyncOperation` URL.
    AsyncOperation(Url),
    /// Poll the `Location` URL.
    Location(Url),
    /// Poll the resource and read `properties.provisioningState`.
    ProvisioningState(Url),
    /// Nothing to poll.
    Done,
}

/// The initial response of a long-running operation.
#[derive(Debug)]
pub struct LongRunningResponse {
    /// HTTP status of the initial response.
    pub status: u16,
    /// The initial response body, if it was JSON.
    pub body: Option<Value>,
    /// Tracks the operation to completion.
    pub poller: Poller,
}

impl LongRunningResponse {
    /// Decode the initial response body, if there was one.
    pub fn model<T: DeserializeOwned>(&self) -> ArmResult<Option<T>> {
        self.body
            .clone()
            .map(serde_json::from_value)
            .transpose()
            .map_err(ArmError::from)
    }

    /// Decode the initial body as `T`, keeping the poller.
    pub fn into_typed<T: DeserializeOwned>(self) -> ArmResult<PollerResponse<T>> {
        let model = self.model()?;
        Ok(PollerResponse {
            http_status: self.status,
            model,
            poller: self.poller,
        })
    }
}

/// A long-running operation whose initial response carries a `T`.
#[derive(Debug)]
pub struct PollerResponse<T> {
    /// HTTP status of the initial response.
    pub http_status: u16,
    /// The resource as returned by the initial response, if any.
    pub model: Option<T>,
    /// Tracks the operation to completion.
    pub poller: Poller,
}

/// Tracks a long-running operation until it reaches a terminal state.
#[derive(Debug)]
pub struct Poller {
    client: ArmClient,
    strategy: PollingStrategy,
    status: PollingStatus,
    interval: Duration,
    last_body: Option<Value>,
}

fn provisioning_state(body: Option<&Value>) -> Option<&str> {
    body?
        .get("properties")?
        .get("provisioningState")?
        .as_str()
}

fn header_url(client: &ArmClient, headers: &HeaderMap, name: &str) -> ArmResult<Option<Url>> {
    match headers.get(name).and_then(|v| v.to_str().ok()) {
        Some(value) if !value.is_empty() => client.url(value).map(Some),
        _ => Ok(None),
    }
}

async fn read_body(response: reqwest::Response) -> ArmResult<Option<Value>> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    // Non-JSON bodies carry nothing the poller needs.
    Ok(serde_json::from_str(&text).ok())
}

impl Poller {
    /// Build a poller from the initial response of a `method` request to
    /// `resource_url`.
    pub async fn from_response(
        client: &ArmClient,
        method: &Method,
        resource_url: Url,
        response: reqwest::Response,
    ) -> ArmResult<LongRunningResponse> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = read_body(response).await?;

        let async_operation = header_url(client, &headers, AZURE_ASYNC_OPERATION)?;
        let location = header_url(client, &headers, LOCATION.as_str())?;
        let state = provisioning_state(body.as_ref()).map(PollingStatus::from_state);

        let (strategy, polling_status) = if let Some(url) = async_operation {
            (PollingStrategy::AsyncOperation(url), PollingStatus::InProgress)
        } else if let Some(url) = location {
            (PollingStrategy::Location(url), PollingStatus::InProgress)
        } else if matches!(*method, Method::PUT | Method::PATCH)
            && state == Some(PollingStatus::InProgress)
        {
            (
                PollingStrategy::ProvisioningState(resource_url),
                PollingStatus::InProgress,
            )
        } else {
            (PollingStrategy::Done, state.unwrap_or(PollingStatus::Succeeded))
        };

        tracing::debug!(
            status,
            strategy = ?strategy,
            "long-running operation started"
        );

        let poller = Poller {
            client: client.clone(),
            strategy,
            status: polling_status,
            interval: retry_after(&headers)
                .unwrap_or(client.polling_policy.default_interval),
            last_body: body.clone(),
        };

        Ok(LongRunningResponse {
            status,
            body,
            poller,
        })
    }

    /// The strategy in use.
    pub fn strategy(&self) -> &PollingStrategy {
        &self.strategy
    }

    /// The last observed status.
    pub fn status(&self) -> PollingStatus {
        self.status
    }

    /// The body of the most recent poll response.
    pub fn last_body(&self) -> Option<&Value> {
        self.last_body.as_ref()
    }

    /// Poll once and return the updated status.
    ///
    /// Does nothing once a terminal status has been observed.
    pub async fn poll_once(&mut self) -> ArmResult<PollingStatus> {
        if self.status.is_terminal() {
            return Ok(self.status);
        }

        let url = match &self.strategy {
            PollingStrategy::AsyncOperation(url)
            | PollingStrategy::Location(url)
            | PollingStrategy::ProvisioningState(url) => url.clone(),
            PollingStrategy::Done => {
                self.status = PollingStatus::Succeeded;
                return Ok(self.status);
            }
        };

        let response = self.client.send_with_retry(Method::GET, url, None).await?;
        let http_status = response.status().as_u16();
        if let Some(delay) = retry_after(response.headers()) {
            self.interval = delay;
        }
        let body = read_body(response).await?;

        self.status = match &self.strategy {
            PollingStrategy::AsyncOperation(_) => body
                .as_ref()
                .and_then(|b| b.get("status"))
                .and_then(Value::as_str)
                .map(PollingStatus::from_state)
                .unwrap_or(PollingStatus::InProgress),
            PollingStrategy::Location(_) => {
                if http_status == 202 {
                    PollingStatus::InProgress
                } else {
                    PollingStatus::Succeeded
                }
            }
            PollingStrategy::ProvisioningState(_) => provisioning_state(body.as_ref())
                .map(PollingStatus::from_state)
                .unwrap_or(PollingStatus::Succeeded),
            PollingStrategy::Done => PollingStatus::Succeeded,
        };
        self.last_body = body;

        tracing::debug!(status = %self.status, http_status, "polled long-running operation");
        Ok(self.status)
    }

    /// Poll until the operation reaches a terminal state.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::LongRunningOperation`] if the operation failed or
    /// was canceled, and [`ArmError::PollTimeout`] if it did not finish within
    /// the client's polling timeout.
    pub async fn poll_until_done(&mut self) -> ArmResult<()> {
        let timeout = self.client.polling_policy.timeout;
        let description = format!("{:?}", self.strategy);

        let polling = async {
            loop {
                match self.status {
                    PollingStatus::Succeeded => return Ok(()),
                    PollingStatus::Failed | PollingStatus::Canceled => {
                        return Err(self.failure());
                    }
                    PollingStatus::InProgress => {
                        tracing::trace!(
                            interval_ms = self.interval.as_millis() as u64,
                            "operation still in progress, waiting"
                        );
                        tokio::time::sleep(self.interval).await;
                        self.poll_once().await?;
                    }
                }
            }
        };

        match timeout {
            Some(limit) => tokio::time::timeout(limit, polling).await.map_err(|_| {
                ArmError::PollTimeout(format!(
                    "operation did not finish within {}s ({description})",
                    limit.as_secs()
                ))
            })?,
            None => polling.await,
        }
    }

    fn failure(&self) -> ArmError {
        let detail = self
            .last_body
            .as_ref()
            .and_then(|b| b.get("error"))
            .and_then(|e| serde_json::from_value::<ErrorDetail>(e.clone()).ok())
            .unwrap_or_default();

        ArmError::LongRunningOperation {
            status: self.status.to_string(),
            code: detail.code.unwrap_or_else(|| "unknown".into()),
            message: ArmClient::truncate_message(
                detail
                    .message
                    .as_deref()
                    .unwrap_or("the operation did not succeed"),
            ),
        }
    }
}
