//! Error types for the catalog client.

use thiserror::Error;

/// Failures while talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The configured base URL cannot be turned into a request URL.
    #[error("invalid catalog base url {url:?}: {reason}")]
    InvalidBaseUrl {
        /// The offending value.
        url: String,
        /// Parser message.
        reason: String,
    },
    /// Transport failure or undecodable body.
    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("catalog endpoint returned {status}")]
    Status {
        /// HTTP status received.
        status: reqwest::StatusCode,
    },
}
