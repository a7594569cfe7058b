//! Contact details a user shares on their sightings.

use chrono::{DateTime, Utc};
use petwatch_core::types::UserId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Display name and phone shown next to a user's sightings.
///
/// Accounts live with the auth provider; this row only exists once the
/// user has set a contact detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    /// The user this profile belongs to.
    pub user_id: UserId,
    /// Name shown to other users.
    pub display_name: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// When the profile last changed.
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// A profile with no contact details.
    pub fn empty(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            display_name: None,
            phone: None,
            updated_at: now,
        }
    }
}

/// Validated profile edit. `None` keeps a field, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New or cleared display name.
    pub display_name: Option<Option<String>>,
    /// New or cleared phone.
    pub phone: Option<Option<String>>,
}

impl ProfileUpdate {
    /// Apply the edit in place and stamp `updated_at`.
    pub fn apply_to(self, profile: &mut UserProfile, now: DateTime<Utc>) {
        if let Some(display_name) = self.display_name {
            profile.display_name = display_name;
        }
        if let Some(phone) = self.phone {
            profile.phone = phone;
        }
        profile.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_sets_and_clears() {
        let start = Utc::now();
        let mut profile = UserProfile {
            display_name: Some("Ana".to_string()),
            ..UserProfile::empty(UserId::new(), start)
        };
        let later = start + chrono::Duration::seconds(5);
        ProfileUpdate {
            display_name: Some(None),
            phone: Some(Some("+54 11 5555 0000".to_string())),
        }
        .apply_to(&mut profile, later);

        assert_eq!(profile.display_name, None);
        assert_eq!(profile.phone.as_deref(), Some("+54 11 5555 0000"));
        assert_eq!(profile.updated_at, later);
    }
}
