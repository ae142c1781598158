//! Freshness classification

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Freshness of a bead relative to the newest known versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Freshness {
    /// Newest of its name, and so is everything in its input closure
    UpToDate,
    /// Newest of its name, but some input (maybe transitive) is stale or missing
    OutOfDate,
    /// A newer version of the same name exists
    Superseded,
}

impl Freshness {
    /// All variants, in reporting order
    pub const ALL: [Freshness; 3] = [Self::UpToDate, Self::OutOfDate, Self::Superseded];

    /// Name used in snapshots
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UpToDate => "UP_TO_DATE",
            Self::OutOfDate => "OUT_OF_DATE",
            Self::Superseded => "SUPERSEDED",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_up_to_date(self) -> bool {
        matches!(self, Self::UpToDate)
    }
}

impl Display for Freshness {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Unknown freshness name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown freshness value: '{0}'")]
pub struct UnknownFreshness(pub String);

impl FromStr for Freshness {
    type Err = UnknownFreshness;

    /// Accepts snapshot names (`OUT_OF_DATE`) and their CLI spelling (`out-of-date`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == normalized)
            .ok_or_else(|| UnknownFreshness(s.to_string()))
    }
}
