//! End-to-end flow: seed a database with several users and habits, load
//! the habit records and run one analysis pass with a fixed today.

use chrono::NaiveDate;
use habitloom_core::{
    analyze_all, completed_habits, longest_streak_of_all, ordered_periodicities,
    worst_completion_rate_of_all, Database, Periodicity,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// 2022-02-08, a Tuesday; every expectation below is relative to it.
fn today() -> NaiveDate {
    d(2022, 2, 8)
}

fn seed(db: &Database) {
    db.add_user("StephanieHochge").unwrap();
    db.add_user("RajaBe").unwrap();
    db.add_user("LibertyEvans").unwrap();

    db.add_habit("StephanieHochge", "Brush teeth", Periodicity::Daily, None)
        .unwrap();
    db.add_habit("StephanieHochge", "Dance", Periodicity::Weekly, None)
        .unwrap();
    db.add_habit("StephanieHochge", "Clean kitchen", Periodicity::Monthly, None)
        .unwrap();
    db.add_habit("StephanieHochge", "Go to dentist", Periodicity::Yearly, None)
        .unwrap();
    db.add_habit("StephanieHochge", "Floss", Periodicity::Daily, None)
        .unwrap();
    db.add_habit("RajaBe", "Brush teeth", Periodicity::Daily, None)
        .unwrap();

    for day in [24, 25, 26, 27] {
        db.complete_habit("StephanieHochge", "Brush teeth", d(2021, 12, day))
            .unwrap();
    }
    db.complete_habit("StephanieHochge", "Brush teeth", d(2022, 1, 1))
        .unwrap();

    for date in [
        d(2022, 1, 18),
        d(2022, 1, 25),
        d(2022, 1, 26),
        d(2022, 2, 1),
        d(2022, 2, 8),
    ] {
        db.complete_habit("StephanieHochge", "Dance", date).unwrap();
    }

    for date in [d(2021, 11, 14), d(2021, 12, 2), d(2022, 2, 3)] {
        db.complete_habit("StephanieHochge", "Clean kitchen", date)
            .unwrap();
    }

    for date in [d(2021, 3, 1), d(2022, 1, 5)] {
        db.complete_habit("StephanieHochge", "Go to dentist", date)
            .unwrap();
    }

    db.complete_habit("RajaBe", "Brush teeth", d(2022, 2, 7))
        .unwrap();
    db.complete_habit("RajaBe", "Brush teeth", d(2022, 2, 8))
        .unwrap();
}

fn open_seeded(dir: &tempfile::TempDir) -> Database {
    let db = Database::open(&dir.path().join("habits.db")).unwrap();
    seed(&db);
    db
}

#[test]
fn one_pass_analysis_over_a_full_habit_list() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_seeded(&dir);

    let habits = db.load_habits("StephanieHochge").unwrap();
    assert_eq!(habits.len(), 5);
    assert_eq!(
        ordered_periodicities(&habits),
        vec![
            Periodicity::Daily,
            Periodicity::Weekly,
            Periodicity::Monthly,
            Periodicity::Yearly
        ]
    );

    let reports = analyze_all(&habits, today()).unwrap();

    let teeth = reports.iter().find(|r| r.name == "Brush teeth").unwrap();
    assert_eq!(teeth.longest_streak, 4);
    assert_eq!(teeth.current_streak, 0);
    assert_eq!(teeth.total_breaks, 2);
    assert_eq!(teeth.completion_rate, Some(0.0));
    assert_eq!(teeth.last_completion, Some(d(2022, 1, 1)));

    let dance = reports.iter().find(|r| r.name == "Dance").unwrap();
    // Four consecutive weeks, still live; three of the four window weeks
    // are completed (the current week does not count).
    assert_eq!(dance.longest_streak, 4);
    assert_eq!(dance.current_streak, 4);
    assert_eq!(dance.total_breaks, 0);
    assert_eq!(dance.completion_rate, Some(0.75));

    let kitchen = reports.iter().find(|r| r.name == "Clean kitchen").unwrap();
    // Nov+Dec form one streak, January was missed, February is live.
    assert_eq!(kitchen.longest_streak, 2);
    assert_eq!(kitchen.current_streak, 1);
    assert_eq!(kitchen.total_breaks, 1);
    assert_eq!(kitchen.completion_rate, None);

    let dentist = reports.iter().find(|r| r.name == "Go to dentist").unwrap();
    assert_eq!(dentist.longest_streak, 2);
    assert_eq!(dentist.current_streak, 2);
    assert_eq!(dentist.total_breaks, 0);
    assert_eq!(dentist.completion_rate, None);

    // Never completed: zeroed without invoking the engine.
    let floss = reports.iter().find(|r| r.name == "Floss").unwrap();
    assert_eq!(floss.longest_streak, 0);
    assert_eq!(floss.current_streak, 0);
    assert_eq!(floss.total_breaks, 0);
    assert_eq!(floss.completion_rate, None);
}

#[test]
fn cross_habit_reducers_report_ties() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_seeded(&dir);

    let habits = db.load_habits("StephanieHochge").unwrap();
    let completed: Vec<_> = completed_habits(&habits).into_iter().cloned().collect();
    assert_eq!(completed.len(), 4);

    let reports = analyze_all(&completed, today()).unwrap();

    let best = longest_streak_of_all(&reports).unwrap();
    assert_eq!(best.value, 4);
    assert_eq!(best.habits, vec!["Brush teeth", "Dance"]);

    let worst = worst_completion_rate_of_all(&reports).unwrap();
    assert_eq!(worst.value, 0.0);
    assert_eq!(worst.habits, vec!["Brush teeth"]);
}

#[test]
fn users_are_analyzed_independently() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_seeded(&dir);

    let habits = db.load_habits("RajaBe").unwrap();
    let reports = analyze_all(&habits, today()).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].current_streak, 2);
    assert_eq!(reports[0].longest_streak, 2);
    assert_eq!(reports[0].total_breaks, 0);

    // A user with no habits at all is a valid, empty analysis.
    let empty = db.load_habits("LibertyEvans").unwrap();
    assert!(empty.is_empty());
    assert!(analyze_all(&empty, today()).unwrap().is_empty());
    assert!(longest_streak_of_all(&[]).is_none());
}
