//! Push gateway configuration.

use serde::{Deserialize, Serialize};

/// Settings for the HTTP push gateway transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Whether push messages are sent at all.
    #[serde(default)]
    pub enabled: bool,
    /// Gateway endpoint accepting `{ subscription, payload }` posts.
    #[serde(default)]
    pub gateway_url: String,
    /// Optional bearer key for the gateway.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            gateway_url: String::new(),
            api_key: None,
            request_timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}
