//! Date partitioning of stored payloads.

use chrono::{NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;

use crate::error::IngestError;

/// UTC calendar day a run belongs to, rendered `YYYY-MM-DD`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionKey(NaiveDate);

impl PartitionKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }

    /// Parse a strict `YYYY-MM-DD` date.
    pub fn parse(s: &str) -> Result<Self, IngestError> {
        if s.len() != 10 {
            return Err(IngestError::Config(format!("invalid partition date: {s}")));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|e| IngestError::Config(format!("invalid partition date {s}: {e}")))
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// How object keys are derived from a partition.
///
/// Both layouts hold one object per day, so a later run on the same day
/// replaces the earlier object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyLayout {
    /// `<date>/<date>_recent_tracks.json`
    #[default]
    Dated,
    /// `<date>/recent_tracks.json`
    DateOnly,
}

impl KeyLayout {
    pub fn object_key(&self, partition: &PartitionKey) -> String {
        match self {
            KeyLayout::Dated => format!("{partition}/{partition}_recent_tracks.json"),
            KeyLayout::DateOnly => format!("{partition}/recent_tracks.json"),
        }
    }
}

impl FromStr for KeyLayout {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dated" => Ok(KeyLayout::Dated),
            "date-only" | "date_only" => Ok(KeyLayout::DateOnly),
            other => Err(IngestError::Config(format!(
                "unknown key layout '{other}' (expected 'dated' or 'date-only')"
            ))),
        }
    }
}
