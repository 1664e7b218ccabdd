//! Result and error types for storeprobe.

use thiserror::Error;

/// Result type for storeprobe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while driving the storefront or the REST service
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Wait timeout elapsed before the element became available
    #[error("Element {locator} not found after {timeout_ms}ms")]
    ElementNotFound {
        /// Locator description
        locator: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
    },

    /// The browser never reached the expected URL
    #[error("Expected URL {expected} within {timeout_ms}ms, browser is at {actual}")]
    UrlMismatch {
        /// URL that was awaited
        expected: String,
        /// Last URL observed
        actual: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
    },

    /// Expected state or value mismatch
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Response code differs from the one the caller asserted
    #[error("{method} {url}: expected HTTP {expected}, got {actual}")]
    HttpStatusMismatch {
        /// HTTP method
        method: String,
        /// Request URL
        url: String,
        /// Expected status code
        expected: u16,
        /// Actual status code
        actual: u16,
    },

    /// Text could not be turned into the expected value
    #[error("Could not extract {what} from text: {text:?}")]
    Parse {
        /// What was being extracted
        what: &'static str,
        /// Offending text
        text: String,
    },

    /// Required configuration value is absent
    #[error("Missing configuration: {key}")]
    MissingConfig {
        /// Configuration key
        key: String,
    },

    /// Configuration value is present but unusable
    #[error("Invalid configuration for {key}: {reason}")]
    InvalidConfig {
        /// Configuration key
        key: String,
        /// What is wrong with the value
        reason: String,
    },

    /// Element handle is no longer attached to the document
    #[error("Element {element} is no longer attached")]
    StaleElement {
        /// Element description
        element: String,
    },

    /// Browser driver failure
    #[error("Browser driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Retry policy gave up
    #[error("{what} still failing after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Operation description
        what: String,
        /// Number of attempts made
        attempts: u32,
        /// Error from the final attempt
        last: Box<ProbeError>,
    },

    /// Fixture error (setup/teardown failed)
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ProbeError {
    /// Build an assertion failure
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Build a driver failure from any displayable error
    pub fn driver(err: impl std::fmt::Display) -> Self {
        Self::Driver {
            message: err.to_string(),
        }
    }

    /// Whether this error means a lookup came back empty or stale
    #[must_use]
    pub const fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. } | Self::StaleElement { .. }
        )
    }
}
