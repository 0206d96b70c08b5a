//! The fixed set of ledger owners.
//!
//! Individuals are a closed enumeration: they are never created or deleted at
//! runtime. The wire value (`kid_name` column) is the display name.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// One of the two ledger owners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Individual {
    /// Holden's ledger
    #[default]
    Holden,
    /// Maude's ledger
    Maude,
}

impl Individual {
    /// Every individual, in selector order.
    pub const ALL: [Self; 2] = [Self::Holden, Self::Maude];

    /// The name stored in the `kid_name` column and shown to the user.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Holden => "Holden",
            Self::Maude => "Maude",
        }
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Returned when a name does not match any [`Individual`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown individual: {0}")]
pub struct UnknownIndividual(pub String);

impl FromStr for Individual {
    type Err = UnknownIndividual;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|individual| individual.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownIndividual(s.to_string()))
    }
}

impl TryFrom<String> for Individual {
    type Error = UnknownIndividual;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}
