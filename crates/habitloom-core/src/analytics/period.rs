//! Period bucketing and the period-start sequence.
//!
//! Every completion date maps to the canonical first day of the period
//! containing it. [`PeriodSequence`] collects those starts for one habit,
//! deduplicated and sorted, and appends a single synthetic period far in
//! the future. The sentinel guarantees that the final gap always exceeds
//! the allowed gap, so downstream break detection needs no special case
//! for "no trailing break yet"; the trick stays contained in this module.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::error::AnalyticsError;
use crate::habit::Periodicity;

/// The canonical first day of the period containing `date`.
///
/// Pure and total: daily is the identity, weekly the Monday on or before,
/// monthly the first of the month, yearly January 1.
pub fn period_start(periodicity: Periodicity, date: NaiveDate) -> NaiveDate {
    match periodicity {
        Periodicity::Daily => date,
        Periodicity::Weekly => {
            date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
        }
        Periodicity::Monthly => date - Duration::days(i64::from(date.day0())),
        Periodicity::Yearly => date - Duration::days(i64::from(date.ordinal0())),
    }
}

/// Which period to test for completion, relative to an injected today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodRef {
    /// The still-open period containing today.
    Current,
    /// The period immediately before the current one.
    Previous,
}

/// The sorted, duplicate-free period starts of one habit, terminated by
/// the synthetic future period.
///
/// Invariant: strictly increasing, length >= 2 (at least one real period
/// plus the sentinel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSequence {
    periodicity: Periodicity,
    starts: Vec<NaiveDate>,
}

impl PeriodSequence {
    /// Build the sequence from a habit's raw completion dates.
    ///
    /// The sentinel is placed two allowed gaps beyond `today`, far enough
    /// ahead that it can never coincide with a genuine trailing period.
    ///
    /// # Errors
    /// Returns [`AnalyticsError::EmptyHistory`] if `completions` is empty;
    /// an empty input has no well-defined bucketing.
    pub fn build(
        periodicity: Periodicity,
        completions: &[NaiveDate],
        today: NaiveDate,
    ) -> Result<Self, AnalyticsError> {
        if completions.is_empty() {
            return Err(AnalyticsError::EmptyHistory);
        }
        let mut starts: Vec<NaiveDate> = completions
            .iter()
            .map(|&date| period_start(periodicity, date))
            .collect();
        starts.sort_unstable();
        starts.dedup();

        let sentinel = period_start(periodicity, today + periodicity.allowed_gap() * 2);
        starts.push(sentinel);
        Ok(Self {
            periodicity,
            starts,
        })
    }

    pub fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    /// All period starts including the trailing sentinel.
    pub fn starts(&self) -> &[NaiveDate] {
        &self.starts
    }

    /// The period starts the habit was actually completed in.
    pub fn real_starts(&self) -> &[NaiveDate] {
        &self.starts[..self.starts.len() - 1]
    }

    /// Number of entries including the sentinel.
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Whether `start` is one of the completed period starts.
    pub fn contains(&self, start: NaiveDate) -> bool {
        self.starts.binary_search(&start).is_ok()
    }

    /// Whether the habit was completed in the current or previous period
    /// relative to `today`.
    ///
    /// `today` must be the same instant used to build this sequence;
    /// mixing instants across one analysis pass produces inconsistent
    /// judgments.
    pub fn completed_in(&self, which: PeriodRef, today: NaiveDate) -> bool {
        let current = period_start(self.periodicity, today);
        match which {
            PeriodRef::Current => self.contains(current),
            PeriodRef::Previous => {
                let previous = period_start(self.periodicity, current - Duration::days(1));
                self.contains(previous)
            }
        }
    }
}
