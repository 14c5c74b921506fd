//! Habit streaks.
//!
//! A streak is the number of consecutive days, walking backward from the
//! reference date, on which the habit has a completed log. The reference day
//! itself is allowed to be unlogged (or logged as not done yet) without
//! breaking the streak; any earlier day without a completed log ends it.

use std::collections::{BTreeMap, HashMap};

use chrono::{Days, NaiveDate};

use crate::records::{Habit, HabitLog};

/// How many days before the reference date the walk may examine.
///
/// The reference day plus this many prior days are checked, so the longest
/// reportable streak is `STREAK_LOOKBACK_DAYS + 1`.
pub const STREAK_LOOKBACK_DAYS: u32 = 30;

/// Habit logs indexed by habit id and date.
///
/// When several logs share a (habit, date) pair the one appearing last in the
/// input wins, mirroring the store's replace-on-write behaviour.
#[derive(Debug, Default)]
pub struct HabitLogIndex<'a> {
    by_habit: HashMap<&'a str, HashMap<NaiveDate, &'a HabitLog>>,
}

impl<'a> HabitLogIndex<'a> {
    pub fn new(logs: &'a [HabitLog]) -> Self {
        let mut by_habit: HashMap<&'a str, HashMap<NaiveDate, &'a HabitLog>> = HashMap::new();
        for log in logs {
            by_habit
                .entry(log.habit_id.as_str())
                .or_default()
                .insert(log.date, log);
        }
        Self { by_habit }
    }

    pub fn get(&self, habit_id: &str, date: NaiveDate) -> Option<&'a HabitLog> {
        self.by_habit.get(habit_id)?.get(&date).copied()
    }

    pub fn is_completed(&self, habit_id: &str, date: NaiveDate) -> bool {
        self.get(habit_id, date).is_some_and(|log| log.completed)
    }

    /// Completed logs on `date` across all habits.
    pub fn completed_on(&self, date: NaiveDate) -> usize {
        self.by_habit
            .values()
            .filter(|days| days.get(&date).is_some_and(|log| log.completed))
            .count()
    }

    /// Current streak for one habit as of `reference`.
    pub fn streak(&self, habit_id: &str, reference: NaiveDate) -> u32 {
        let Some(days) = self.by_habit.get(habit_id) else {
            return 0;
        };

        let mut streak = 0;
        for offset in 0..=STREAK_LOOKBACK_DAYS {
            let Some(day) = reference.checked_sub_days(Days::new(u64::from(offset))) else {
                break;
            };
            if days.get(&day).is_some_and(|log| log.completed) {
                streak += 1;
            } else if offset > 0 {
                break;
            }
        }
        streak
    }
}

/// Current streak for `habit_id` over an unsorted log list.
pub fn compute_streak(habit_id: &str, logs: &[HabitLog], reference: NaiveDate) -> u32 {
    HabitLogIndex::new(logs).streak(habit_id, reference)
}

/// Streaks for every habit, keyed by habit id, sharing one log index.
pub fn compute_streaks(
    habits: &[Habit],
    logs: &[HabitLog],
    reference: NaiveDate,
) -> BTreeMap<String, u32> {
    let index = HabitLogIndex::new(logs);
    habits
        .iter()
        .map(|habit| (habit.id.clone(), index.streak(&habit.id, reference)))
        .collect()
}

/// Display text and fill percentage for a streak badge.
///
/// The fill reaches 100% at ten days.
pub fn habit_streak_badge(streak: u32) -> (String, u8) {
    let label = match streak {
        0 => "Start today!".to_string(),
        1 => "1 day".to_string(),
        n => format!("{n} days"),
    };
    let fill = streak.saturating_mul(10).min(100) as u8;
    (label, fill)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn log(habit: &str, date: NaiveDate, completed: bool) -> HabitLog {
        HabitLog::new("u1", habit, date, completed)
    }

    /// Completed logs for the `n` days ending `days_back` days before `today`.
    fn run(habit: &str, today: NaiveDate, days_back: u64, n: u64) -> Vec<HabitLog> {
        (0..n)
            .map(|i| log(habit, today - Days::new(days_back + i), true))
            .collect()
    }

    #[test]
    fn no_logs_means_no_streak() {
        assert_eq!(compute_streak("h1", &[], day(2024, 5, 10)), 0);
    }

    #[test]
    fn five_days_including_today() {
        let today = day(2024, 5, 10);
        assert_eq!(compute_streak("h1", &run("h1", today, 0, 5), today), 5);
    }

    #[test]
    fn unlogged_today_keeps_yesterdays_streak() {
        let today = day(2024, 5, 10);
        assert_eq!(compute_streak("h1", &run("h1", today, 1, 5), today), 5);
    }

    #[test]
    fn incomplete_today_keeps_yesterdays_streak() {
        let today = day(2024, 5, 10);
        let mut logs = run("h1", today, 1, 3);
        logs.push(log("h1", today, false));
        assert_eq!(compute_streak("h1", &logs, today), 3);
    }

    #[test]
    fn gap_before_today_stops_the_walk() {
        let today = day(2024, 5, 10);
        // Completed today and yesterday, nothing two days ago, older run ignored.
        let mut logs = run("h1", today, 0, 2);
        logs.extend(run("h1", today, 3, 4));
        assert_eq!(compute_streak("h1", &logs, today), 2);
    }

    #[test]
    fn incomplete_past_day_stops_the_walk() {
        let today = day(2024, 5, 10);
        let mut logs = run("h1", today, 0, 3);
        logs.push(log("h1", today - Days::new(3), false));
        logs.extend(run("h1", today, 4, 2));
        assert_eq!(compute_streak("h1", &logs, today), 3);
    }

    #[test]
    fn yesterday_missing_and_today_missing_is_zero() {
        let today = day(2024, 5, 10);
        assert_eq!(compute_streak("h1", &run("h1", today, 2, 5), today), 0);
    }

    #[test]
    fn other_habits_do_not_count() {
        let today = day(2024, 5, 10);
        let mut logs = run("h2", today, 0, 6);
        logs.extend(run("h1", today, 0, 2));
        assert_eq!(compute_streak("h1", &logs, today), 2);
        assert_eq!(compute_streak("h2", &logs, today), 6);
    }

    #[test]
    fn lookback_is_bounded() {
        let today = day(2024, 5, 10);
        let logs = run("h1", today, 0, 90);
        assert_eq!(compute_streak("h1", &logs, today), STREAK_LOOKBACK_DAYS + 1);

        let logs = run("h1", today, 1, 90);
        assert_eq!(compute_streak("h1", &logs, today), STREAK_LOOKBACK_DAYS);
    }

    #[test]
    fn later_duplicate_replaces_earlier() {
        let today = day(2024, 5, 10);
        let yesterday = today - Days::new(1);
        let logs = vec![
            log("h1", today, true),
            log("h1", yesterday, true),
            log("h1", yesterday, false),
        ];
        assert_eq!(compute_streak("h1", &logs, today), 1);

        let logs = vec![
            log("h1", today, true),
            log("h1", yesterday, false),
            log("h1", yesterday, true),
        ];
        assert_eq!(compute_streak("h1", &logs, today), 2);
    }

    #[test]
    fn log_order_does_not_matter() {
        let today = day(2024, 5, 10);
        let mut logs = run("h1", today, 0, 4);
        logs.reverse();
        assert_eq!(compute_streak("h1", &logs, today), 4);
    }

    #[test]
    fn streaks_for_all_habits() {
        let today = day(2024, 5, 10);
        let habits = vec![Habit::new("u1", "Read"), Habit::new("u1", "Walk")];
        let logs = run(&habits[0].id, today, 0, 3);

        let streaks = compute_streaks(&habits, &logs, today);
        assert_eq!(streaks[&habits[0].id], 3);
        assert_eq!(streaks[&habits[1].id], 0);
    }

    #[test]
    fn completed_on_counts_habits_not_duplicates() {
        let today = day(2024, 5, 10);
        let logs = vec![
            log("h1", today, true),
            log("h1", today, true),
            log("h2", today, true),
            log("h3", today, false),
        ];
        assert_eq!(HabitLogIndex::new(&logs).completed_on(today), 2);
    }

    #[test]
    fn badge_text_and_fill() {
        assert_eq!(habit_streak_badge(0), ("Start today!".to_string(), 0));
        assert_eq!(habit_streak_badge(1), ("1 day".to_string(), 10));
        assert_eq!(habit_streak_badge(14), ("14 days".to_string(), 100));
    }
}
