//! Read model joining a sighting with its reporter's contact details.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Sighting;
use crate::user::UserProfile;

/// A sighting as shown in listings and detail pages. Serializes as the
/// sighting's own fields plus the reporter's contact details.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SightingDetails {
    /// The sighting itself.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub sighting: Sighting,
    /// Reporter's display name, if set.
    pub user_display_name: Option<String>,
    /// Reporter's phone, if set.
    pub user_phone: Option<String>,
}

impl SightingDetails {
    /// Join `sighting` with its reporter's profile, if they have one.
    pub fn new(sighting: Sighting, profile: Option<&UserProfile>) -> Self {
        Self {
            sighting,
            user_display_name: profile.and_then(|p| p.display_name.clone()),
            user_phone: profile.and_then(|p| p.phone.clone()),
        }
    }
}
