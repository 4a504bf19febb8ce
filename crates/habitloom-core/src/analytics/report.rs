//! Per-habit analysis reports and cross-habit reducers.

use chrono::NaiveDate;
use serde::Serialize;

use super::period::PeriodSequence;
use super::rate::completion_rate;
use super::streaks::{current_streak, longest_streak, total_breaks};
use crate::error::AnalyticsError;
use crate::habit::{Habit, Periodicity};

/// Everything the engine derives for a single habit.
///
/// `completion_rate` is `None` for monthly and yearly habits, where the
/// metric is not applicable, and for habits with no completions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitReport {
    pub name: String,
    pub periodicity: Periodicity,
    pub last_completion: Option<NaiveDate>,
    pub longest_streak: u32,
    pub current_streak: u32,
    pub total_breaks: u32,
    pub completion_rate: Option<f64>,
}

impl HabitReport {
    /// The report a never-completed habit gets without invoking the
    /// engine: no streaks, no breaks, rate undefined.
    fn empty(habit: &Habit) -> Self {
        Self {
            name: habit.name.clone(),
            periodicity: habit.periodicity,
            last_completion: None,
            longest_streak: 0,
            current_streak: 0,
            total_breaks: 0,
            completion_rate: None,
        }
    }
}

/// Analyze one habit with at least one completion as of `today`.
///
/// All figures are derived from the same period sequence and the same
/// injected instant, so one call is internally consistent.
///
/// # Errors
/// Returns [`AnalyticsError::EmptyHistory`] for a habit with no
/// completions.
pub fn analyze_habit(habit: &Habit, today: NaiveDate) -> Result<HabitReport, AnalyticsError> {
    let periods = PeriodSequence::build(habit.periodicity, &habit.completions, today)?;
    let rate = match completion_rate(&periods, today) {
        Ok(rate) => Some(rate),
        Err(AnalyticsError::RateNotApplicable(_)) => None,
        Err(err) => return Err(err),
    };
    Ok(HabitReport {
        name: habit.name.clone(),
        periodicity: habit.periodicity,
        last_completion: habit.last_completion(),
        longest_streak: longest_streak(&periods),
        current_streak: current_streak(&periods, today),
        total_breaks: total_breaks(&periods, today),
        completion_rate: rate,
    })
}

/// Analyze a whole habit list with one consistent `today`.
///
/// Never-completed habits are filtered out before the engine runs and
/// reported with zeroed metrics directly.
pub fn analyze_all(habits: &[Habit], today: NaiveDate) -> Result<Vec<HabitReport>, AnalyticsError> {
    habits
        .iter()
        .map(|habit| {
            if habit.has_completions() {
                analyze_habit(habit, today)
            } else {
                Ok(HabitReport::empty(habit))
            }
        })
        .collect()
}

/// The habits that have been completed at least once.
pub fn completed_habits(habits: &[Habit]) -> Vec<&Habit> {
    habits.iter().filter(|h| h.has_completions()).collect()
}

/// An extreme metric value together with every habit achieving it.
///
/// Ties are not broken arbitrarily; all tied names are reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricTie<T> {
    pub value: T,
    pub habits: Vec<String>,
}

/// The longest streak across all reports, with every habit achieving it.
///
/// Returns `None` for an empty input rather than raising.
pub fn longest_streak_of_all(reports: &[HabitReport]) -> Option<MetricTie<u32>> {
    let best = reports.iter().map(|r| r.longest_streak).max()?;
    Some(MetricTie {
        value: best,
        habits: reports
            .iter()
            .filter(|r| r.longest_streak == best)
            .map(|r| r.name.clone())
            .collect(),
    })
}

/// The lowest completion rate across all reports that have one, with
/// every habit achieving it.
///
/// Reports without a rate (monthly/yearly habits) are ignored; returns
/// `None` when no report carries a rate.
pub fn worst_completion_rate_of_all(reports: &[HabitReport]) -> Option<MetricTie<f64>> {
    let rated: Vec<(&HabitReport, f64)> = reports
        .iter()
        .filter_map(|r| r.completion_rate.map(|rate| (r, rate)))
        .collect();
    let worst = rated
        .iter()
        .map(|(_, rate)| *rate)
        .min_by(|a, b| a.total_cmp(b))?;
    Some(MetricTie {
        value: worst,
        habits: rated
            .iter()
            .filter(|(_, rate)| *rate == worst)
            .map(|(r, _)| r.name.clone())
            .collect(),
    })
}
