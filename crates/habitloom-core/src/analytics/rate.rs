//! Trailing-window completion rate.
//!
//! The rate is the fraction of the last four weeks' periods in which the
//! habit was completed at least once: 28 possible periods for daily
//! habits, 4 for weekly ones. The still-open current period never counts.
//! Monthly and yearly habits have no meaningful four-week window, so the
//! metric is reported as not applicable rather than computed against a
//! fabricated one.

use chrono::{Duration, NaiveDate};

use super::period::{period_start, PeriodSequence};
use crate::error::AnalyticsError;
use crate::habit::Periodicity;

/// Number of periods in the trailing window, where defined.
fn window_periods(periodicity: Periodicity) -> Result<u32, AnalyticsError> {
    match periodicity {
        Periodicity::Daily => Ok(28),
        Periodicity::Weekly => Ok(4),
        other => Err(AnalyticsError::RateNotApplicable(other)),
    }
}

/// The habit's completion rate over the four weeks preceding the current
/// period, in `[0, 1]`.
///
/// # Errors
/// Returns [`AnalyticsError::RateNotApplicable`] for monthly and yearly
/// habits.
pub fn completion_rate(
    periods: &PeriodSequence,
    today: NaiveDate,
) -> Result<f64, AnalyticsError> {
    let periodicity = periods.periodicity();
    let possible = window_periods(periodicity)?;
    let current = period_start(periodicity, today);
    let window_start = period_start(periodicity, current - Duration::weeks(4));
    let completed = periods
        .real_starts()
        .iter()
        .filter(|&&start| window_start <= start && start < current)
        .count();
    Ok(completed as f64 / f64::from(possible))
}
