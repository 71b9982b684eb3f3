use thiserror::Error;

use crate::resource_id::ResourceIdError;

/// Errors that can occur when interacting with the Azure Resource Manager API.
#[derive(Error, Debug)]
pub enum ArmError {
    /// The request failed with a non-success status and no ARM error envelope.
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// The API returned an ARM error envelope (`{"error": {"code", "message"}}`).
    #[error("API error ({status} {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A request or response payload could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP request failed at the transport level.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint URL is invalid.
    #[error("Invalid endpoint URL: {message}")]
    InvalidEndpoint {
        message: String,
        #[source]
        source: Option<url::ParseError>,
    },

    /// A required configuration value is missing.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// A resource ID could not be parsed.
    #[error(transparent)]
    ResourceId(#[from] ResourceIdError),

    /// A long-running operation reached a failed or cancelled terminal state.
    #[error("long-running operation {status}: {code} - {message}")]
    LongRunningOperation {
        status: String,
        code: String,
        message: String,
    },

    /// Polling did not reach a terminal state within the configured timeout.
    #[error("Polling timed out: {0}")]
    PollTimeout(String),

    /// An error raised by a named operation, e.g. `virtualnetworkpeerings.Get`.
    #[error("{operation}: {source}")]
    Operation {
        operation: &'static str,
        #[source]
        source: Box<ArmError>,
    },
}

impl ArmError {
    /// Build an [`ArmError::Http`] error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Build an [`ArmError::InvalidEndpoint`] error carrying the URL parse failure.
    pub fn invalid_endpoint_with_source(message: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidEndpoint {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Wrap this error with the name of the operation that produced it.
    ///
    /// Errors that are already wrapped keep their original operation name.
    pub fn with_operation(self, operation: &'static str) -> Self {
        match self {
            wrapped @ Self::Operation { .. } => wrapped,
            other => Self::Operation {
                operation,
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, looking through [`ArmError::Operation`] wrappers.
    pub fn root(&self) -> &ArmError {
        match self {
            Self::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    /// The HTTP status code of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self.root() {
            Self::Http { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the failure was a `404 Not Found`.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The ARM error code, if the response carried an error envelope.
    pub fn code(&self) -> Option<&str> {
        match self.root() {
            Self::Api { code, .. } | Self::LongRunningOperation { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Result type alias for ARM operations.
pub type ArmResult<T> = std::result::Result<T, ArmError>;

/// Attach an operation name to the error side of a result.
pub trait OperationContext<T> {
    /// Wrap the error with `operation`, e.g. `"virtualnetworkpeerings.Get"`.
    fn operation(self, operation: &'static str) -> ArmResult<T>;
}

impl<T> OperationContext<T> for ArmResult<T> {
    fn operation(self, operation: &'static str) -> ArmResult<T> {
        self.map_err(|e| e.with_operation(operation))
    }
}
