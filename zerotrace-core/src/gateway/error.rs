//! Gateway error types.

use thiserror::Error;

/// Errors returned by a [`super::RemoteGateway`].
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure (unreachable, timeout, reset).
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("HTTP error: {0}")]
    Http(u16),

    /// The body could not be decoded into the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The gateway could not be configured.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl GatewayError {
    /// Returns true if the error means "no usable data" rather than a failure.
    pub fn is_no_data(&self) -> bool {
        matches!(self, GatewayError::Malformed(_))
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            GatewayError::Http(status.as_u16())
        } else if err.is_builder() {
            GatewayError::Configuration(err.to_string())
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_display() {
        assert_eq!(GatewayError::Http(404).to_string(), "HTTP error: 404");
        assert!(GatewayError::Malformed("eof".into())
            .to_string()
            .contains("malformed"));
    }

    #[test]
    fn test_only_malformed_is_no_data() {
        assert!(GatewayError::Malformed("x".into()).is_no_data());
        assert!(!GatewayError::Network("x".into()).is_no_data());
        assert!(!GatewayError::Http(500).is_no_data());
    }
}
