//! Habit analytics engine.
//!
//! A pure, single-threaded computation: every figure is a deterministic
//! function of a habit's completion dates, its periodicity and one
//! injected "today". Nothing here reads the wall clock, touches storage
//! or caches results.
//!
//! - [`period`]: period bucketing, the period-start sequence and its
//!   future-period sentinel, current/previous-period membership
//! - [`streaks`]: break indices, streak lengths, current and longest
//!   streak, total breaks
//! - [`rate`]: trailing four-week completion rate
//! - [`report`]: per-habit reports and cross-habit reducers

pub mod period;
pub mod rate;
pub mod report;
pub mod streaks;

pub use period::{period_start, PeriodRef, PeriodSequence};
pub use rate::completion_rate;
pub use report::{
    analyze_all, analyze_habit, completed_habits, longest_streak_of_all,
    worst_completion_rate_of_all, HabitReport, MetricTie,
};
pub use streaks::{break_indices, current_streak, longest_streak, streak_lengths, total_breaks};
