//! Streak and break analysis over a period-start sequence.
//!
//! A gap between two consecutive period starts that exceeds the
//! periodicity's allowed gap is a break; the stretches between breaks are
//! streaks. The sequence's trailing sentinel guarantees at least one
//! break index, so the run ending at the last real period always shows up
//! as the final streak length.

use chrono::NaiveDate;

use super::period::{PeriodRef, PeriodSequence};

/// Indices into the gap sequence whose gap strictly exceeds the allowed
/// gap. Never empty: the sentinel's gap always qualifies.
pub fn break_indices(periods: &PeriodSequence) -> Vec<usize> {
    let allowed = periods.periodicity().allowed_gap();
    periods
        .starts()
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[1] - pair[0] > allowed)
        .map(|(index, _)| index)
        .collect()
}

/// The length of each unbroken run of consecutive periods, oldest first.
///
/// Lengths are the distances between successive break boundaries, with a
/// virtual boundary before the first element. They always sum to
/// `periods.len() - 1`.
pub fn streak_lengths(periods: &PeriodSequence) -> Vec<u32> {
    let mut boundaries: Vec<i64> = vec![-1];
    boundaries.extend(break_indices(periods).into_iter().map(|i| i as i64));
    boundaries
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) as u32)
        .collect()
}

/// The habit's longest streak so far.
pub fn longest_streak(periods: &PeriodSequence) -> u32 {
    streak_lengths(periods).into_iter().max().unwrap_or(0)
}

/// The length of the live run as of `today`.
///
/// Without a completion in the previous period the live run cannot be
/// older than the current period: the result is 1 if the current period
/// is completed, 0 otherwise. With the previous period completed, the
/// live run is the final streak (the one absorbed by the sentinel break).
pub fn current_streak(periods: &PeriodSequence, today: NaiveDate) -> u32 {
    if !periods.completed_in(PeriodRef::Previous, today) {
        if periods.completed_in(PeriodRef::Current, today) {
            1
        } else {
            0
        }
    } else {
        streak_lengths(periods).last().copied().unwrap_or(0)
    }
}

/// How often the habit's streaks were broken since the first completion.
///
/// While the habit was completed in the current or previous period the
/// final break index is only the sentinel artifact of the live run and is
/// discounted; once the habit has gone fully stale every detected break
/// is real.
pub fn total_breaks(periods: &PeriodSequence, today: NaiveDate) -> u32 {
    let breaks = break_indices(periods).len();
    if periods.completed_in(PeriodRef::Current, today)
        || periods.completed_in(PeriodRef::Previous, today)
    {
        breaks.saturating_sub(1) as u32
    } else {
        breaks as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::Periodicity;
    use chrono::Duration;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn build(p: Periodicity, completions: &[NaiveDate], today: NaiveDate) -> PeriodSequence {
        PeriodSequence::build(p, completions, today).unwrap()
    }

    #[test]
    fn daily_run_with_one_gap() {
        // Four consecutive days, then a five-day gap to New Year.
        let completions = [
            d(2021, 12, 24),
            d(2021, 12, 25),
            d(2021, 12, 26),
            d(2021, 12, 27),
            d(2022, 1, 1),
        ];
        let periods = build(Periodicity::Daily, &completions, d(2022, 2, 1));
        assert_eq!(break_indices(&periods), vec![3, 4]);
        assert_eq!(streak_lengths(&periods), vec![4, 1]);
        assert_eq!(longest_streak(&periods), 4);
    }

    #[test]
    fn weekly_adjacent_weeks_form_one_streak() {
        let today = d(2022, 1, 26); // inside the week of 01-24
        let completions = [d(2022, 1, 18), d(2022, 1, 25)];
        let periods = build(Periodicity::Weekly, &completions, today);
        assert_eq!(break_indices(&periods), vec![1]);
        assert_eq!(streak_lengths(&periods), vec![2]);
    }

    #[test]
    fn break_index_sensitive_to_allowed_gap() {
        // 6 days apart: a break for daily, none for weekly.
        let completions = [d(2021, 7, 3), d(2021, 7, 9)];
        let daily = build(Periodicity::Daily, &completions, d(2021, 8, 1));
        assert_eq!(break_indices(&daily), vec![0, 1]);
        let weekly = build(Periodicity::Weekly, &completions, d(2021, 8, 1));
        // Both dates fall in adjacent weeks; only the sentinel gap breaks.
        assert_eq!(break_indices(&weekly), vec![1]);
    }

    #[test]
    fn monthly_and_yearly_streaks() {
        let monthly = build(
            Periodicity::Monthly,
            &[d(2021, 10, 14), d(2021, 11, 2), d(2022, 1, 20)],
            d(2022, 2, 1),
        );
        // Oct and Nov are consecutive; December is missing.
        assert_eq!(streak_lengths(&monthly), vec![2, 1]);

        let yearly = build(
            Periodicity::Yearly,
            &[d(2021, 6, 1), d(2022, 3, 4)],
            d(2022, 5, 1),
        );
        assert_eq!(streak_lengths(&yearly), vec![2]);
        assert_eq!(longest_streak(&yearly), 2);
    }

    #[test]
    fn current_streak_zero_when_stale() {
        let today = d(2022, 2, 1);
        let completions = [d(2021, 12, 24), d(2021, 12, 25)];
        let periods = build(Periodicity::Daily, &completions, today);
        assert_eq!(current_streak(&periods, today), 0);
    }

    #[test]
    fn current_streak_one_when_only_current_period_completed() {
        let today = d(2022, 2, 1);
        let completions = [d(2021, 12, 24), d(2022, 2, 1)];
        let periods = build(Periodicity::Daily, &completions, today);
        assert_eq!(current_streak(&periods, today), 1);
    }

    #[test]
    fn current_streak_continues_live_run() {
        let today = d(2022, 1, 26); // week of 01-24
        let completions = [d(2022, 1, 3), d(2022, 1, 18), d(2022, 1, 25)];
        let periods = build(Periodicity::Weekly, &completions, today);
        // Weeks of 01-17 and 01-24 are consecutive and the run is live.
        assert_eq!(current_streak(&periods, today), 2);
    }

    #[test]
    fn total_breaks_discounts_live_run_artifact() {
        let today = d(2022, 1, 26);
        let live = build(
            Periodicity::Weekly,
            &[d(2022, 1, 3), d(2022, 1, 25)],
            today,
        );
        // One real break (week of 01-10 missing); sentinel break discounted.
        assert_eq!(total_breaks(&live, today), 1);

        let stale = build(
            Periodicity::Daily,
            &[
                d(2021, 12, 24),
                d(2021, 12, 25),
                d(2021, 12, 26),
                d(2021, 12, 27),
                d(2022, 1, 1),
            ],
            d(2022, 2, 1),
        );
        // The trailing break is real once the habit has gone stale.
        assert_eq!(total_breaks(&stale, d(2022, 2, 1)), 2);
    }

    fn any_periodicity() -> impl Strategy<Value = Periodicity> {
        prop_oneof![
            Just(Periodicity::Daily),
            Just(Periodicity::Weekly),
            Just(Periodicity::Monthly),
            Just(Periodicity::Yearly),
        ]
    }

    fn any_date() -> impl Strategy<Value = NaiveDate> {
        (0i64..=25_000).prop_map(|offset| d(1990, 1, 1) + Duration::days(offset))
    }

    proptest! {
        #[test]
        fn at_least_one_break_for_any_history(
            p in any_periodicity(),
            dates in proptest::collection::vec(any_date(), 1..40),
        ) {
            let periods = PeriodSequence::build(p, &dates, d(2060, 1, 1)).unwrap();
            prop_assert!(!break_indices(&periods).is_empty());
        }

        #[test]
        fn streak_lengths_account_for_every_real_period(
            p in any_periodicity(),
            dates in proptest::collection::vec(any_date(), 1..40),
        ) {
            let periods = PeriodSequence::build(p, &dates, d(2060, 1, 1)).unwrap();
            let total: u32 = streak_lengths(&periods).iter().sum();
            prop_assert_eq!(total as usize, periods.len() - 1);
        }

        #[test]
        fn longest_streak_is_max_of_lengths(
            p in any_periodicity(),
            dates in proptest::collection::vec(any_date(), 1..40),
        ) {
            let periods = PeriodSequence::build(p, &dates, d(2060, 1, 1)).unwrap();
            let max = streak_lengths(&periods).into_iter().max().unwrap();
            prop_assert_eq!(longest_streak(&periods), max);
        }
    }
}
