//! Error types shared by the dispatcher, the paginator and the HTTP client.

use crate::models::ExecutionItem;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while running one operation.
#[derive(Debug, Error)]
pub enum Error {
    /// The (resource, operation) pair is not one of the supported combinations.
    #[error("The operation \"{operation}\" is not known for resource \"{resource}\"")]
    UnknownOperation { resource: String, operation: String },

    /// The Reddit API call could not be issued or returned a non-2xx status.
    #[error("{}", api_failure_message(.status, .body))]
    ApiRequestFailed { status: Option<u16>, body: String },

    /// A profile detail that must contain items came back empty.
    #[error("Reddit returned no {detail} for the authenticated user")]
    EmptyResult { detail: String },

    /// A response did not have the envelope the operation expects.
    #[error("Unexpected response shape from {path}: expected {expected}")]
    UnexpectedResponseShape { path: String, expected: String },

    /// A required parameter was not supplied for the item.
    #[error("Missing parameter \"{name}\" for item {item}")]
    MissingParameter { name: String, item: usize },

    /// A parameter was supplied with the wrong type or an unknown value.
    #[error("Invalid value for parameter \"{name}\": {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Local configuration or credential storage problem.
    #[error("Configuration error: {0}")]
    Config(String),
}

fn api_failure_message(status: &Option<u16>, body: &str) -> String {
    match status {
        Some(code) => format!("Reddit API request failed with HTTP {code}: {body}"),
        None => format!("Reddit API request failed: {body}"),
    }
}

impl Error {
    /// Shorthand for a transport-level failure with no HTTP status.
    pub fn transport(message: impl Into<String>) -> Self {
        Error::ApiRequestFailed {
            status: None,
            body: message.into(),
        }
    }

    pub(crate) fn shape(path: impl Into<String>, expected: impl Into<String>) -> Self {
        Error::UnexpectedResponseShape {
            path: path.into(),
            expected: expected.into(),
        }
    }

    pub(crate) fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::ApiRequestFailed {
            status: err.status().map(|s| s.as_u16()),
            body: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::invalid("items", err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// A batch stopped at a failing item without continue-on-fail.
///
/// Records produced for the items before `item` are kept in `completed`;
/// the failing item contributes nothing.
#[derive(Debug, Error)]
#[error("Item {item} failed: {source}")]
pub struct BatchError {
    pub item: usize,
    #[source]
    pub source: Error,
    pub completed: Vec<ExecutionItem>,
}
