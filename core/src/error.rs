//! Error types for the PocketShelf API client.
//!
//! # Design
//! Every failure is a request failure. The variants only record where the
//! round trip broke down; the server's own meaning (a rejected item, an
//! unknown form type) stays inside `HttpError` as the raw status and body.

use thiserror::Error;

/// Errors returned by the item and form clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, reset, DNS).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

/// The configured API base URL is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API base URL is empty")]
    EmptyBaseUrl,

    #[error("API base URL must start with http:// or https://, got '{0}'")]
    UnsupportedScheme(String),
}
