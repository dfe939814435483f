use thiserror::Error;

/// Errors from [`crate::source::EventSource::fetch_page`].
///
/// Every variant is terminal for the current attempt. The caller decides
/// whether to retry; the cursor must not move either way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request parameters cannot be sent upstream.
    #[error("invalid page request: {message}")]
    InvalidRequest {
        /// Description of the problem.
        message: String,
    },
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL with credentials redacted.
        url: String,
        /// Timeout that elapsed.
        timeout_secs: u64,
    },
    /// The service answered with a non-success status.
    #[error("request to {url} failed with HTTP status {status}: {message}")]
    Http {
        /// Requested URL with credentials redacted.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail reported by the client.
        message: String,
    },
    /// Connecting to the service failed.
    #[error("network error requesting {url}: {message}")]
    Network {
        /// Requested URL with credentials redacted.
        url: String,
        /// Error detail reported by the client.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// Requested URL with credentials redacted.
        url: String,
        /// Decoder error message.
        message: String,
    },
}
