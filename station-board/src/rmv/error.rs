//! RMV client error types.

/// Errors from the RMV HAFAS client.
#[derive(Debug, thiserror::Error)]
pub enum RmvError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid API token or unauthorized
    #[error("unauthorized (invalid API token)")]
    Unauthorized,

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// No API token was configured
    #[error("no RMV API token configured")]
    MissingToken,

    /// The request is missing required parameters
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),
}
