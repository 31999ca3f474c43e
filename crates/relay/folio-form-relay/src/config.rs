use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://formspree.io/f/movlqezb";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub endpoint: String,
    /// Sent as the `Accept` header so the relay answers with JSON instead of
    /// a redirect page.
    pub accept: String,
    /// Request timeout in seconds; `None` leaves the client default.
    pub timeout_secs: Option<u64>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            accept: "application/json".to_string(),
            timeout_secs: Some(15),
        }
    }
}
