//! Record client error types.

/// Errors from fetching records off a service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No endpoint is configured for the named service.
    #[error("no endpoint configured for service '{0}'")]
    UnknownService(String),
    /// The request path could not be joined onto the service base URL.
    #[error("invalid request path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
    /// A request header value could not be encoded.
    #[error("invalid {name} header: {reason}")]
    InvalidHeader { name: String, reason: String },
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The service returned a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response body was not valid JSON.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Response body was JSON but not an object.
    #[error("{endpoint} did not return a JSON object")]
    NotAnObject { endpoint: String },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl ClientError {
    /// HTTP status of an API error, if the failure was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
