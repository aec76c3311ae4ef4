//! Error types for a deploy run

use reqwest::StatusCode;
use thiserror::Error;

/// Maximum number of characters of a response body carried in error messages
pub const BODY_EXCERPT_LEN: usize = 200;

/// Main error type for a deploy run
///
/// Every variant is fatal to the run; the caller reports the message and
/// exits nonzero. There is no retry or backoff anywhere.
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("unauthorized, check your Render API key")]
    Unauthorized,

    #[error("deploy error (HTTP {status}): {body}")]
    TriggerFailed { status: StatusCode, body: String },

    #[error("could not retrieve deploy information (HTTP {status}): {body}")]
    FetchFailed { status: StatusCode, body: String },

    #[error("Render API returned non-JSON response (HTTP {status}): {body}")]
    MalformedResponse { status: StatusCode, body: String },

    #[error("no deploys found after triggering deploy")]
    NoDeploys,

    #[error("deploy status: {0}")]
    TerminalStatus(String),

    #[error("missing required input: {0}")]
    MissingInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("interrupted while waiting for deploy")]
    Interrupted,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Truncate a response body for inclusion in an error message
pub fn body_excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_LEN).collect()
}
