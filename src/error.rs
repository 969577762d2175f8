//! Error types
//!
//! The router itself recovers nothing; these types only describe what went
//! wrong at the edges (startup, forwarding, response validation).

use thiserror::Error;

/// Startup and configuration errors
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid address '{addr}': {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("invalid duration '{0}' (expected e.g. \"30s\", \"2m\", \"1h\")")]
    Duration(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure while forwarding a request to a backend instance
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("failed to build upstream uri: {0}")]
    Uri(#[from] hyper::http::Error),

    #[error("backend instance unreachable: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("failed to start backend process: {0}")]
    Start(#[source] std::io::Error),
}

/// A JSON payload that does not match the cursor response shape
#[derive(Debug, Error)]
#[error("response does not match schema: {0}")]
pub struct SchemaError(#[from] pub serde_json::Error);

/// Why an `analyze` call produced no result
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid request: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("transport failure: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read response body: {0}")]
    Body(#[from] hyper::Error),

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
