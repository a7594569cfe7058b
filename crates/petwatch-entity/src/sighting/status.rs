//! Sighting lifecycle state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a reported pet is in its journey home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "sighting_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SightingStatus {
    /// The pet is missing.
    Lost,
    /// The pet was found or reunited.
    Found,
    /// Someone is sheltering the pet temporarily.
    InTransit,
}

impl SightingStatus {
    /// Whether an owner may move a sighting from `self` to `next`.
    ///
    /// `lost -> found`, `lost -> in_transit -> found`, and staying in place
    /// are allowed. `found` is terminal.
    pub fn can_transition_to(&self, next: SightingStatus) -> bool {
        use SightingStatus::*;
        matches!(
            (self, next),
            (Lost, Lost)
                | (Found, Found)
                | (InTransit, InTransit)
                | (Lost, Found)
                | (Lost, InTransit)
                | (InTransit, Found)
        )
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lost => "lost",
            Self::Found => "found",
            Self::InTransit => "in_transit",
        }
    }
}

impl fmt::Display for SightingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SightingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lost" => Ok(Self::Lost),
            "found" => Ok(Self::Found),
            "in_transit" => Ok(Self::InTransit),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SightingStatus::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(Lost.can_transition_to(Found));
        assert!(Lost.can_transition_to(InTransit));
        assert!(InTransit.can_transition_to(Found));
        assert!(Found.can_transition_to(Found));
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!Found.can_transition_to(Lost));
        assert!(!Found.can_transition_to(InTransit));
        assert!(!InTransit.can_transition_to(Lost));
    }

    #[test]
    fn test_parse_and_serde_names() {
        assert_eq!("in_transit".parse::<SightingStatus>(), Ok(InTransit));
        assert!("perdido".parse::<SightingStatus>().is_err());
        assert_eq!(serde_json::to_string(&InTransit).expect("ser"), "\"in_transit\"");
    }
}
