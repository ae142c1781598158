//! Freeze timestamps
//!
//! Beads carry their freeze time as text like `20190321T191922693711+0100`.
//! [`FreezeTime`] keeps that text verbatim (snapshots must reproduce it
//! byte for byte) next to the parsed instant used for ordering.

use crate::error::MetaError;
use chrono::{DateTime, FixedOffset, TimeZone};
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// `chrono` format of bead timestamps (microsecond precision, numeric offset)
pub const FREEZE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S%6f%z";

/// Offset-aware freeze timestamp
///
/// Ordering compares instants; two timestamps naming the same instant in
/// different offsets are ordered by their text so that the order stays total.
/// Version ordering of beads compares [`instant`](Self::instant) only.
#[derive(Debug, Clone)]
pub struct FreezeTime {
    instant: DateTime<FixedOffset>,
    raw: String,
}

impl FreezeTime {
    /// Parse a bead timestamp
    ///
    /// Accepts the bead format and, for hand-written input, RFC 3339.
    ///
    /// # Errors
    /// Returns error if the text matches neither format
    pub fn parse(value: &str) -> Result<Self, MetaError> {
        let instant = DateTime::parse_from_str(value, FREEZE_TIME_FORMAT)
            .or_else(|err| DateTime::parse_from_rfc3339(value).map_err(|_| err))
            .map_err(|err| MetaError::invalid_freeze_time(value, err))?;
        Ok(Self {
            instant,
            raw: value.to_string(),
        })
    }

    /// Build from an instant, rendering it in the bead format
    #[must_use]
    pub fn from_datetime<Tz: TimeZone>(time: &DateTime<Tz>) -> Self {
        let instant = time.fixed_offset();
        Self {
            raw: instant.format(FREEZE_TIME_FORMAT).to_string(),
            instant,
        }
    }

    /// Parsed instant
    #[inline]
    #[must_use]
    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    /// Original text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for FreezeTime {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for FreezeTime {}

impl Hash for FreezeTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialOrd for FreezeTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FreezeTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant
            .cmp(&other.instant)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl Display for FreezeTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for FreezeTime {
    type Err = MetaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for FreezeTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> serde::Deserialize<'de> for FreezeTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
