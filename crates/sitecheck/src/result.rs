//! Result and error types for Sitecheck.

use thiserror::Error;

/// Result type for Sitecheck operations
pub type SitecheckResult<T> = Result<T, SitecheckError>;

/// Coarse classification of a [`SitecheckError`].
///
/// Page checks and reporting sinks branch on the kind rather than on the
/// concrete variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A locator, file, or page could not be found
    NotFound,
    /// A bounded wait ran out
    Timeout,
    /// Malformed input or a missing required field
    ParseError,
    /// HTTP or webhook delivery failed
    NetworkError,
    /// Filesystem failure
    Io,
    /// Invalid configuration
    Config,
    /// Browser could not be launched or driven
    Browser,
}

/// Errors that can occur in Sitecheck
#[derive(Debug, Error)]
pub enum SitecheckError {
    /// Element never appeared within the wait window
    #[error("Element not found: {selector} (waited {waited_ms}ms)")]
    ElementNotFound {
        /// Selector that was queried
        selector: String,
        /// Time spent waiting
        waited_ms: u64,
    },

    /// Element present but never became interactable
    #[error("Element not interactable: {selector} after {ms}ms")]
    Timeout {
        /// Selector that was queried
        selector: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// No page registered or reachable at the URL
    #[error("Page not found: {url}")]
    PageNotFound {
        /// URL that failed
        url: String,
    },

    /// Navigation failed
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Test data source could not be parsed
    #[error("Parse error in {source_name}: {message}")]
    Parse {
        /// File or source being parsed
        source_name: String,
        /// Error message
        message: String,
    },

    /// Required builder field missing
    #[error("Missing required field: {field}")]
    MissingField {
        /// Field name
        field: &'static str,
    },

    /// Network / webhook failure
    #[error("Network error: {message}")]
    Network {
        /// Error message
        message: String,
    },

    /// Browser launch or CDP failure
    #[error("Browser error: {message}")]
    Browser {
        /// Error message
        message: String,
    },

    /// Invalid configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SitecheckError {
    /// Create a parse error for a named source
    #[must_use]
    pub fn parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a network error
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a browser error
    #[must_use]
    pub fn browser(message: impl Into<String>) -> Self {
        Self::Browser {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Classify the error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ElementNotFound { .. } | Self::PageNotFound { .. } => ErrorKind::NotFound,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Parse { .. } | Self::MissingField { .. } | Self::Json(_) => ErrorKind::ParseError,
            Self::Network { .. } | Self::Navigation { .. } => ErrorKind::NetworkError,
            Self::Browser { .. } => ErrorKind::Browser,
            Self::Config { .. } => ErrorKind::Config,
            Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

impl From<reqwest::Error> for SitecheckError {
    fn from(err: reqwest::Error) -> Self {
        Self::network(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_kind() {
        let err = SitecheckError::ElementNotFound {
            selector: "h1".to_string(),
            waited_ms: 10_000,
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("h1"));
    }

    #[test]
    fn test_timeout_kind() {
        let err = SitecheckError::Timeout {
            selector: "button".to_string(),
            ms: 500,
        };
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.to_string().contains("500ms"));
    }

    #[test]
    fn test_parse_kinds() {
        assert_eq!(
            SitecheckError::parse("links.json", "bad").kind(),
            ErrorKind::ParseError
        );
        assert_eq!(
            SitecheckError::MissingField { field: "url" }.kind(),
            ErrorKind::ParseError
        );
    }

    #[test]
    fn test_network_kind() {
        let err = SitecheckError::network("connection refused");
        assert_eq!(err.kind(), ErrorKind::NetworkError);
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_io_not_found_maps_to_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SitecheckError = io.into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SitecheckError = io.into();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
