//! Automatic resource provider registration.
//!
//! A subscription must be registered with a resource provider namespace
//! (e.g. `Microsoft.Kusto`) before it can create resources in it. ARM reports
//! a missing registration as `409 MissingSubscriptionRegistration`; the client
//! then registers the namespace, waits for the registration to complete and
//! retries the original request once.

use reqwest::Method;
use serde::Deserialize;
use url::Url;

use crate::client::ArmClient;
use crate::error::{ArmError, ArmResult};

/// API version of the `Microsoft.Resources` provider operations.
pub(crate) const API_VERSION: &str = "2016-02-01";

/// Error code ARM returns when the subscription is not registered.
pub const MISSING_REGISTRATION_CODE: &str = "MissingSubscriptionRegistration";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Provider {
    #[serde(default)]
    registration_state: Option<String>,
}

/// Whether `err` reports an unregistered resource provider.
pub(crate) fn is_missing_registration(err: &ArmError) -> bool {
    err.status() == Some(409)
        && err
            .code()
            .is_some_and(|code| code.eq_ignore_ascii_case(MISSING_REGISTRATION_CODE))
}

/// Extract the subscription ID and provider namespace from a request URL.
///
/// Looks for `/subscriptions/{id}/.../providers/{namespace}`; the last
/// `providers` segment wins, as nested resources repeat it.
pub(crate) fn provider_from_url(url: &Url) -> Option<(String, String)> {
    let segments: Vec<&str> = url.path_segments()?.collect();

    let subscription = segments
        .windows(2)
        .find(|w| w[0].eq_ignore_ascii_case("subscriptions") && !w[1].is_empty())
        .map(|w| w[1].to_string())?;

    let namespace = segments
        .windows(2)
        .rev()
        .find(|w| w[0].eq_ignore_ascii_case("providers") && !w[1].is_empty())
        .map(|w| w[1].to_string())?;

    Some((subscription, namespace))
}

/// Register `namespace` on `subscription` and wait until ARM reports it as
/// `Registered`.
#[tracing::instrument(name = "arm::registration::register_provider", skip(client))]
pub(crate) async fn register_provider(
    client: &ArmClient,
    subscription: &str,
    namespace: &str,
) -> ArmResult<()> {
    let query = [("api-version", API_VERSION)];
    let provider_path = format!("/subscriptions/{subscription}/providers/{namespace}");
    let register_url = client.resource_url(&format!("{provider_path}/register"), &query)?;
    let status_url = client.resource_url(&provider_path, &query)?;

    client
        .send_with_retry(Method::POST, register_url, None)
        .await?;
    tracing::debug!("registration requested");

    let interval = client.polling_policy.default_interval;
    let waiting = async {
        loop {
            let response = client
                .send_with_retry(Method::GET, status_url.clone(), None)
                .await?;
            let provider: Provider = response.json().await?;
            let state = provider.registration_state.unwrap_or_default();

            if state.eq_ignore_ascii_case("Registered") {
                tracing::debug!("resource provider registered");
                return Ok(());
            }
            tracing::trace!(state = %state, "waiting for registration");
            tokio::time::sleep(interval).await;
        }
    };

    match client.polling_policy.timeout {
        Some(limit) => tokio::time::timeout(limit, waiting).await.map_err(|_| {
            ArmError::PollTimeout(format!(
                "registration of {namespace} did not finish within {}s",
                limit.as_secs()
            ))
        })?,
        None => waiting.await,
    }
}
