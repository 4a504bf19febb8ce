//! # Habitloom Core Library
//!
//! Core business logic for the Habitloom habit tracker. The interesting
//! part is the analytics engine: given the dates a habit was checked off
//! and its periodicity, it buckets the dates into periods and derives
//! streaks, streak breaks and a trailing completion rate. Interactive
//! surfaces are thin layers over this library and live elsewhere.
//!
//! ## Architecture
//!
//! - **Analytics**: a pure engine over (periodicity, completion dates,
//!   injected today) with no clock access, I/O or caching. Reports for a
//!   whole habit list are independent per habit.
//! - **Storage**: SQLite-based persistence for users, habits and
//!   completions, plus TOML-based configuration. Handles are passed in
//!   explicitly, never acquired as a construction side effect.
//!
//! ## Key Components
//!
//! - [`Periodicity`] / [`Habit`]: immutable habit value types
//! - [`PeriodSequence`]: bucketed period starts with the future sentinel
//! - [`analyze_habit`] / [`analyze_all`]: per-habit reports
//! - [`Database`]: user/habit/completion persistence
//! - [`Config`]: application configuration

pub mod analytics;
pub mod error;
pub mod habit;
pub mod storage;

pub use analytics::{
    analyze_all, analyze_habit, break_indices, completed_habits, completion_rate, current_streak,
    longest_streak, longest_streak_of_all, period_start, streak_lengths, total_breaks,
    worst_completion_rate_of_all, HabitReport, MetricTie, PeriodRef, PeriodSequence,
};
pub use error::{AnalyticsError, ConfigError, CoreError, DatabaseError, Result};
pub use habit::{ordered_periodicities, Habit, Periodicity};
pub use storage::{Config, Database, HabitRow};
