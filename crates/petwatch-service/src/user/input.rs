//! Profile edit input and its validation.

use serde::{Deserialize, Serialize};

use petwatch_core::error::AppError;
use petwatch_entity::user::ProfileUpdate;

/// Longest display name, in characters.
pub const DISPLAY_NAME_MAX_LEN: usize = 80;
/// Fewest digits in a phone number.
pub const PHONE_MIN_DIGITS: usize = 6;
/// Most digits in a phone number (E.164).
pub const PHONE_MAX_DIGITS: usize = 15;

/// A profile edit. Absent fields are left unchanged, blank ones are cleared.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
    /// New display name.
    pub display_name: Option<String>,
    /// New phone.
    pub phone: Option<String>,
}

impl ProfilePatch {
    /// Check the given fields. At least one must be present.
    pub fn validate(self) -> Result<ProfileUpdate, AppError> {
        if self.display_name.is_none() && self.phone.is_none() {
            return Err(AppError::validation(
                "At least one of display_name or phone is required",
            ));
        }
        Ok(ProfileUpdate {
            display_name: self.display_name.map(display_name).transpose()?,
            phone: self.phone.map(phone).transpose()?,
        })
    }
}

fn display_name(name: String) -> Result<Option<String>, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(None);
    }
    if name.chars().count() > DISPLAY_NAME_MAX_LEN {
        return Err(AppError::invalid_field(
            "display_name",
            format!("must be at most {DISPLAY_NAME_MAX_LEN} characters"),
        ));
    }
    Ok(Some(name.to_string()))
}

/// Digits with optional `+`, spaces, dashes, dots, and parentheses.
fn phone(raw: String) -> Result<Option<String>, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if !raw
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '.' | '(' | ')'))
    {
        return Err(AppError::invalid_field("phone", "contains invalid characters"));
    }
    if raw.char_indices().any(|(i, c)| c == '+' && i != 0) {
        return Err(AppError::invalid_field("phone", "'+' may only lead the number"));
    }
    let digits = raw.chars().filter(char::is_ascii_digit).count();
    if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits) {
        return Err(AppError::invalid_field(
            "phone",
            format!("must have {PHONE_MIN_DIGITS} to {PHONE_MAX_DIGITS} digits"),
        ));
    }
    Ok(Some(raw.to_string()))
}
