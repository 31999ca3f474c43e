use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[cfg(feature = "http")]
    #[error("form request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid relay endpoint '{0}'")]
    InvalidEndpoint(String),

    #[error("form relay rejected the submission: {0}")]
    Rejected(String),

    /// Failure reported by a host-side transport (e.g. the browser's fetch).
    #[error("transport error: {0}")]
    Transport(String),
}
