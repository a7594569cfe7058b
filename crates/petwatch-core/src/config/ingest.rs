//! Sighting submission configuration.

use serde::{Deserialize, Serialize};

/// Settings for sighting ingest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Per-user rolling-window limit.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Push `expires_at` forward again when the owner edits a sighting.
    #[serde(default)]
    pub renew_expiration_on_edit: bool,
}

/// Rolling-window submission cap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Submissions allowed inside one window.
    #[serde(default = "default_max_per_window")]
    pub max_per_window: u32,
    /// Window length in seconds.
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_per_window: default_max_per_window(),
            window_seconds: default_window_seconds(),
        }
    }
}

fn default_max_per_window() -> u32 {
    1
}

fn default_window_seconds() -> u64 {
    86_400
}
