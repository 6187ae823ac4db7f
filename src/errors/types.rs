//! Error type definitions for the IPTV aggregator

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Disk access failures while reading inputs or writing outputs
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source handling errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Web layer errors
    #[error("Web error: {0}")]
    Web(#[from] WebError),

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Resource not found errors
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A run of the same kind is already active
    #[error("Operation already in progress: {operation_type}")]
    OperationInProgress { operation_type: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Subscription fetch specific errors
#[derive(Error, Debug)]
pub enum SourceError {
    /// Request did not complete within the configured timeout
    #[error("Connection timeout: {url}")]
    Timeout { url: String },

    /// Non-success HTTP status from the subscription host
    #[error("HTTP error: {status} - {url}")]
    Http { status: u16, url: String },

    /// Body could not be decompressed
    #[error("Decode error: {url} - {message}")]
    Decode { url: String, message: String },

    /// Connection level failure (DNS, refused, TLS, ...)
    #[error("Transport error: {url} - {message}")]
    Transport { url: String, message: String },
}

/// Web layer specific errors
#[derive(Error, Debug)]
pub enum WebError {
    /// Missing required headers
    #[error("Missing header: {header}")]
    MissingHeader { header: String },

    /// Invalid authentication token
    #[error("Invalid authentication: {message}")]
    InvalidAuth { message: String },
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an operation in progress error
    pub fn operation_in_progress<O: Into<String>>(operation_type: O) -> Self {
        Self::OperationInProgress {
            operation_type: operation_type.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl SourceError {
    /// Classify a reqwest failure for the given (already obfuscated) URL
    pub fn from_reqwest(url: &str, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = error.status() {
            Self::Http {
                status: status.as_u16(),
                url: url.to_string(),
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

impl WebError {
    /// Create an invalid auth error
    pub fn invalid_auth<S: Into<String>>(message: S) -> Self {
        Self::InvalidAuth {
            message: message.into(),
        }
    }

    /// Create a missing header error
    pub fn missing_header<S: Into<String>>(header: S) -> Self {
        Self::MissingHeader {
            header: header.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = AppError::operation_in_progress("aggregation");
        assert_eq!(err.to_string(), "Operation already in progress: aggregation");

        let err = AppError::from(SourceError::Http {
            status: 502,
            url: "http://example.com/a.m3u".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Source error: HTTP error: 502 - http://example.com/a.m3u"
        );

        let err = AppError::from(WebError::missing_header("authorization"));
        assert_eq!(err.to_string(), "Web error: Missing header: authorization");
    }
}
