#![doc = include_str!("../README.md")]

pub mod auth;
pub mod client;
pub mod discriminated;
pub mod enums;
pub mod error;
pub mod models;
pub mod paging;
pub mod polling;
pub mod registration;
pub mod resource_id;

pub use error::{ArmError, ArmResult, OperationContext};

#[doc(hidden)]
pub mod __private {
    pub use serde;
}

/// Helpers for testing crates built on this one against a mock server.
#[cfg(feature = "test-support")]
pub mod test_support {
    use std::time::Duration;

    use wiremock::MockServer;

    use crate::auth::ArmCredential;
    use crate::client::{ArmClient, PollingPolicy, RetryPolicy};

    /// Test access token (not a real token).
    pub const TEST_ACCESS_TOKEN: &str = "test-token";

    /// Create a client connected to `server` with fast retries and polling.
    pub async fn setup_mock_client(server: &MockServer) -> ArmClient {
        ArmClient::builder()
            .endpoint(server.uri())
            .credential(ArmCredential::access_token(TEST_ACCESS_TOKEN))
            .retry_policy(RetryPolicy {
                max_retries: 2,
                initial_backoff: Duration::from_millis(1),
            })
            .polling_policy(PollingPolicy {
                default_interval: Duration::from_millis(5),
                timeout: Some(Duration::from_secs(5)),
            })
            .build()
            .expect("should build client")
    }
}
