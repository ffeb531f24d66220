//! Error types for the Zadara client.

use thiserror::Error;

/// Errors that can occur when using the Zadara client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection settings could not be resolved or are invalid
    /// (host, key, port, timeout).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A caller-supplied parameter was rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// The request could not be delivered to the API endpoint.
    #[error("Could not connect to {host} on port {port} via {protocol}")]
    Connect {
        /// Host the request was sent to.
        host: String,
        /// Port the request was sent to.
        port: u16,
        /// `HTTP` or `HTTPS`.
        protocol: &'static str,
        /// Underlying transport failure.
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP exchange failed after the request was sent.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a status code outside the accepted set.
    #[error(
        "API server did not return an HTTP 200, 201, 202, 204 or 302 response. \
         Status \"{status} {reason}\" was returned instead.  Please investigate."
    )]
    Status {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase.
        reason: String,
    },

    /// A top-level `status-msg` or `message` error envelope.
    #[error("A general API error was returned: \"{0}\".")]
    General(String),

    /// An error reported inside the nested `response` object.
    #[error("The API server returned an error: \"{0}\".")]
    Api(String),

    /// The response body (or a request body) was not valid JSON.
    #[error("Failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The response body was not valid UTF-8.
    #[error("Response body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl ClientError {
    /// Shorthand for a [`ClientError::Validation`].
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Errors reported by the API server itself: a rejected HTTP status or
    /// an error envelope in the response body.
    pub fn is_runtime(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::General(_) | Self::Api(_))
    }

    /// Errors caused by what the caller passed in, or by a body that could
    /// not be decoded.
    pub fn is_parameter(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Validation(_) | Self::Json(_) | Self::Utf8(_)
        )
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_mentions_code() {
        let err = ClientError::Status {
            status: 404,
            reason: "Not Found".to_string(),
        };
        assert!(err.to_string().contains("404 Not Found"));
        assert!(err.is_runtime());
        assert!(!err.is_parameter());
    }

    #[test]
    fn test_api_error_prefix() {
        let err = ClientError::Api("The request has been submitted".to_string());
        assert_eq!(
            err.to_string(),
            "The API server returned an error: \"The request has been submitted\"."
        );
    }

    #[test]
    fn test_classification() {
        assert!(ClientError::Config("x".into()).is_parameter());
        assert!(ClientError::invalid("x").is_parameter());
        assert!(ClientError::General("x".into()).is_runtime());
    }
}
