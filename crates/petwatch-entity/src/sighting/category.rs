//! Pet category enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of animal a sighting reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "pet_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PetCategory {
    /// Dog.
    Dog,
    /// Cat.
    Cat,
    /// Bird.
    Bird,
    /// Anything else.
    Other,
}

impl PetCategory {
    /// Return the category as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dog => "dog",
            Self::Cat => "cat",
            Self::Bird => "bird",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PetCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dog" => Ok(Self::Dog),
            "cat" => Ok(Self::Cat),
            "bird" => Ok(Self::Bird),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}
