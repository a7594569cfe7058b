//! Zone-match notification configuration.

use serde::{Deserialize, Serialize};

/// Settings for notifications produced by zone matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Base URL used to build deep links (`{base}/sightings/{id}`).
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Title used for push messages.
    #[serde(default = "default_title")]
    pub title: String,
    /// Also notify the author when a sighting falls in their own zone.
    #[serde(default)]
    pub notify_sighting_owner: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            public_base_url: default_public_base_url(),
            title: default_title(),
            notify_sighting_owner: false,
        }
    }
}

fn default_public_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_title() -> String {
    "New sighting in your zone".to_string()
}
