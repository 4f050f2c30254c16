/// Errors from the RAG store HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum RagError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The RAG service returned a non-2xx status code.
    #[error("RAG service error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to decode RAG response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured service URL cannot address document paths.
    #[error("Invalid RAG service URL: {0}")]
    InvalidUrl(String),
}
