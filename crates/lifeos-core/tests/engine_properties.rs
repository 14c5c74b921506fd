//! Property tests for the aggregation engine.

use chrono::{Datelike, Days, NaiveDate};
use lifeos_core::engine::{compute_goal_progress, STREAK_LOOKBACK_DAYS};
use lifeos_core::{
    build_month_grid, compute_quick_stats, compute_streak, CalendarCell, Goal, GoalMilestone,
    HabitLog, Task,
};
use proptest::prelude::*;

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

fn arb_logs() -> impl Strategy<Value = Vec<HabitLog>> {
    prop::collection::vec((0u64..60, any::<bool>(), 0usize..3), 0..80).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(offset, completed, habit)| {
                let date = reference().checked_sub_days(Days::new(offset)).unwrap();
                HabitLog::new("u1", format!("h{habit}"), date, completed)
            })
            .collect()
    })
}

fn arb_milestones() -> impl Strategy<Value = Vec<GoalMilestone>> {
    prop::collection::vec(any::<bool>(), 0..40).prop_map(|flags| {
        flags
            .into_iter()
            .enumerate()
            .map(|(i, completed)| {
                let mut m = GoalMilestone::new(format!("m{i}"), i as u32);
                m.completed = completed;
                m
            })
            .collect()
    })
}

/// Tasks due anywhere in February through April 2024, some undated.
fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(prop::option::of(0u64..90), 0..40).prop_map(|dues| {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        dues.into_iter()
            .enumerate()
            .map(|(i, due)| {
                let mut task = Task::new("u1", format!("t{i}"));
                task.due_date = due.map(|offset| start.checked_add_days(Days::new(offset)).unwrap());
                task
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn streak_is_bounded_and_deterministic(logs in arb_logs()) {
        let first = compute_streak("h0", &logs, reference());
        prop_assert!(first <= STREAK_LOOKBACK_DAYS + 1);
        prop_assert_eq!(first, compute_streak("h0", &logs, reference()));
    }

    #[test]
    fn streak_ignores_log_order_without_duplicates(logs in arb_logs()) {
        let mut seen = std::collections::HashSet::new();
        let unique: Vec<HabitLog> = logs
            .into_iter()
            .filter(|log| seen.insert((log.habit_id.clone(), log.date)))
            .collect();
        let mut reversed = unique.clone();
        reversed.reverse();
        prop_assert_eq!(
            compute_streak("h1", &unique, reference()),
            compute_streak("h1", &reversed, reference())
        );
    }

    #[test]
    fn progress_stays_in_range(milestones in arb_milestones()) {
        let progress = compute_goal_progress(&milestones);
        prop_assert!(progress <= 100);
        let done = milestones.iter().filter(|m| m.completed).count();
        if milestones.is_empty() || done == 0 {
            prop_assert_eq!(progress, 0);
        }
        if !milestones.is_empty() && done == milestones.len() {
            prop_assert_eq!(progress, 100);
        }
    }

    #[test]
    fn goal_mutators_keep_progress_derived(milestones in arb_milestones()) {
        let mut goal = Goal::new("u1", "g");
        goal.set_milestones(milestones.clone());
        prop_assert_eq!(goal.progress(), compute_goal_progress(&milestones));
    }

    #[test]
    fn month_grid_is_padding_plus_days(year in 1900i32..2200, month in 1u32..=12) {
        let grid = build_month_grid(year, month, &[], &[], reference()).unwrap();
        let padding = grid.iter().take_while(|c| matches!(c, CalendarCell::Padding)).count();
        let days: Vec<u32> = grid.iter().filter_map(CalendarCell::as_day).map(|d| d.day).collect();
        prop_assert!(padding < 7);
        prop_assert_eq!(padding + days.len(), grid.len());
        prop_assert!((28..=31).contains(&days.len()));
        prop_assert_eq!(days, (1..=grid.len() as u32 - padding as u32).collect::<Vec<_>>());
    }

    #[test]
    fn progress_is_idempotent(milestones in arb_milestones()) {
        prop_assert_eq!(compute_goal_progress(&milestones), compute_goal_progress(&milestones));
    }

    #[test]
    fn month_grid_is_idempotent(tasks in arb_tasks(), logs in arb_logs(), month in 2u32..=4) {
        let first = build_month_grid(2024, month, &tasks, &logs, reference()).unwrap();
        let second = build_month_grid(2024, month, &tasks, &logs, reference()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn month_grid_buckets_each_task_once(tasks in arb_tasks(), month in 2u32..=4) {
        let grid = build_month_grid(2024, month, &tasks, &[], reference()).unwrap();
        let mut bucketed: Vec<&str> = Vec::new();
        for cell in grid.iter().filter_map(CalendarCell::as_day) {
            for task in &cell.tasks {
                prop_assert_eq!(task.due_date, Some(cell.date));
                bucketed.push(task.id.as_str());
            }
        }
        let mut expected: Vec<&str> = tasks
            .iter()
            .filter(|t| t.due_date.is_some_and(|d| d.year() == 2024 && d.month() == month))
            .map(|t| t.id.as_str())
            .collect();
        bucketed.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(bucketed, expected);
    }

    #[test]
    fn quick_stats_are_idempotent(logs in arb_logs()) {
        let a = compute_quick_stats(&[], &[], &logs, &[], reference());
        let b = compute_quick_stats(&[], &[], &logs, &[], reference());
        prop_assert_eq!(a, b);
    }
}

#[test]
fn invalid_month_is_rejected() {
    assert!(build_month_grid(2024, 0, &[], &[], reference()).is_err());
    assert!(build_month_grid(2024, 13, &[], &[], reference()).is_err());
}
