//! Folio form relay
//!
//! The contact form's single outbound call: a POST of `name`, `email` and
//! `message` to a hosted form relay.
//! - [`FormPayload`]: the three fields
//! - [`FormRelay`]: async seam the page core submits through
//! - [`HttpFormRelay`] (feature `http`): reqwest implementation

pub mod config;
pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod payload;

use async_trait::async_trait;

pub use config::{RelayConfig, DEFAULT_ENDPOINT};
pub use error::RelayError;
#[cfg(feature = "http")]
pub use http::HttpFormRelay;
pub use payload::FormPayload;

/// What came back from a submission that resolved.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RelayReceipt {
    pub status: u16,
}

impl RelayReceipt {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait FormRelay: Send + Sync {
    /// Post the payload. Resolving at all counts as delivered; only a
    /// transport failure is an error.
    async fn submit(&self, payload: &FormPayload) -> Result<RelayReceipt, RelayError>;

    fn endpoint(&self) -> &str;
}
