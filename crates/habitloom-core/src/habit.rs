//! Habit value types.
//!
//! A habit is an immutable record of a name, a periodicity and the dates
//! on which it was checked off. All derived figures (streaks, breaks,
//! completion rate) are recomputed on demand by [`crate::analytics`]
//! rather than cached on the habit itself.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// The cadence at which a habit is expected to recur.
///
/// The variant order is the canonical display order (daily < weekly <
/// monthly < yearly) and is what `Ord` derives from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Periodicity {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Periodicity {
    /// All periodicities in canonical order.
    pub const ALL: [Periodicity; 4] = [
        Periodicity::Daily,
        Periodicity::Weekly,
        Periodicity::Monthly,
        Periodicity::Yearly,
    ];

    /// The canonical string tag for this periodicity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Periodicity::Daily => "daily",
            Periodicity::Weekly => "weekly",
            Periodicity::Monthly => "monthly",
            Periodicity::Yearly => "yearly",
        }
    }

    /// Maximum time between two consecutive completed periods before a
    /// break is recorded.
    ///
    /// Monthly (32 days) and yearly (366 days) are fixed upper bounds
    /// rather than calendar-aware gaps: a missed month always produces a
    /// gap of at least 58 days, a missed year one of at least 730.
    pub fn allowed_gap(&self) -> Duration {
        match self {
            Periodicity::Daily => Duration::days(1),
            Periodicity::Weekly => Duration::days(7),
            Periodicity::Monthly => Duration::days(32),
            Periodicity::Yearly => Duration::days(366),
        }
    }
}

impl FromStr for Periodicity {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Periodicity::Daily),
            "weekly" => Ok(Periodicity::Weekly),
            "monthly" => Ok(Periodicity::Monthly),
            "yearly" => Ok(Periodicity::Yearly),
            other => Err(AnalyticsError::InvalidPeriodicity(other.to_string())),
        }
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable habit record: the engine's unit of analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// Habit name, unique per user at the storage layer.
    pub name: String,
    pub periodicity: Periodicity,
    /// Completion dates, unordered and possibly containing several
    /// entries per period.
    pub completions: Vec<NaiveDate>,
}

impl Habit {
    pub fn new(
        name: impl Into<String>,
        periodicity: Periodicity,
        completions: Vec<NaiveDate>,
    ) -> Self {
        Self {
            name: name.into(),
            periodicity,
            completions,
        }
    }

    /// Whether this habit has been checked off at least once.
    pub fn has_completions(&self) -> bool {
        !self.completions.is_empty()
    }

    /// The most recent completion date, if any.
    pub fn last_completion(&self) -> Option<NaiveDate> {
        self.completions.iter().copied().max()
    }
}

/// The distinct periodicities present in `habits`, in canonical order.
pub fn ordered_periodicities(habits: &[Habit]) -> Vec<Periodicity> {
    Periodicity::ALL
        .into_iter()
        .filter(|p| habits.iter().any(|h| h.periodicity == *p))
        .collect()
}
