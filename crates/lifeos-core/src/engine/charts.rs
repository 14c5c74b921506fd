//! Series behind the dashboard charts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::streak::HabitLogIndex;
use crate::dates::{self, serde_day};
use crate::records::{Goal, HabitLog, Task};

/// Default length of the habit trend, in days.
pub const DEFAULT_TREND_DAYS: u32 = 7;

/// Longest accepted habit trend, in days.
pub const MAX_TREND_DAYS: u32 = 366;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskCompletionSplit {
    pub completed: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyHabitCount {
    #[serde(with = "serde_day")]
    pub date: NaiveDate,
    pub completed: usize,
}

/// Colour band of a goal progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressBand {
    /// Below 30%
    Low,
    /// 30% up to 70%
    Medium,
    /// 70% and above
    High,
}

impl ProgressBand {
    pub fn for_progress(progress: u8) -> Self {
        if progress < 30 {
            Self::Low
        } else if progress < 70 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgressBar {
    pub goal_id: String,
    pub title: String,
    pub progress: u8,
    pub band: ProgressBand,
    pub completed_milestones: usize,
    pub total_milestones: usize,
}

pub fn task_completion_split(tasks: &[Task]) -> TaskCompletionSplit {
    let completed = tasks.iter().filter(|t| t.completed).count();
    TaskCompletionSplit {
        completed,
        pending: tasks.len() - completed,
    }
}

/// Completed habit logs per day for the `days` days ending at `reference`.
///
/// `days` is capped at [`MAX_TREND_DAYS`].
pub fn habit_completion_trend(
    logs: &[HabitLog],
    reference: NaiveDate,
    days: u32,
) -> Vec<DailyHabitCount> {
    let index = HabitLogIndex::new(logs);
    dates::last_n_days(reference, days.min(MAX_TREND_DAYS))
        .into_iter()
        .map(|date| DailyHabitCount {
            date,
            completed: index.completed_on(date),
        })
        .collect()
}

pub fn goal_progress_bars(goals: &[Goal]) -> Vec<GoalProgressBar> {
    goals
        .iter()
        .map(|goal| GoalProgressBar {
            goal_id: goal.id.clone(),
            title: goal.title.clone(),
            progress: goal.progress(),
            band: ProgressBand::for_progress(goal.progress()),
            completed_milestones: goal.completed_milestones(),
            total_milestones: goal.milestones().len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn splits_tasks_by_completion() {
        let mut done = Task::new("u1", "done");
        done.completed = true;
        let tasks = vec![done, Task::new("u1", "a"), Task::new("u1", "b")];
        assert_eq!(
            task_completion_split(&tasks),
            TaskCompletionSplit {
                completed: 1,
                pending: 2
            }
        );
    }

    #[test]
    fn trend_covers_window_oldest_first() {
        let today = day(2024, 3, 10);
        let logs = vec![
            HabitLog::new("u1", "h1", today, true),
            HabitLog::new("u1", "h2", today, true),
            HabitLog::new("u1", "h1", today - Days::new(6), true),
            HabitLog::new("u1", "h1", today - Days::new(7), true),
            HabitLog::new("u1", "h2", today - Days::new(1), false),
        ];

        let trend = habit_completion_trend(&logs, today, DEFAULT_TREND_DAYS);
        assert_eq!(trend.len(), 7);
        assert_eq!(trend[0].date, today - Days::new(6));
        assert_eq!(trend[0].completed, 1);
        assert_eq!(trend[5].completed, 0);
        assert_eq!(trend[6].completed, 2);
    }

    #[test]
    fn trend_window_is_capped() {
        let trend = habit_completion_trend(&[], day(2024, 3, 10), u32::MAX);
        assert_eq!(trend.len(), MAX_TREND_DAYS as usize);
        assert!(habit_completion_trend(&[], day(2024, 3, 10), 0).is_empty());
    }

    #[test]
    fn progress_bands() {
        assert_eq!(ProgressBand::for_progress(0), ProgressBand::Low);
        assert_eq!(ProgressBand::for_progress(29), ProgressBand::Low);
        assert_eq!(ProgressBand::for_progress(30), ProgressBand::Medium);
        assert_eq!(ProgressBand::for_progress(69), ProgressBand::Medium);
        assert_eq!(ProgressBand::for_progress(70), ProgressBand::High);
        assert_eq!(ProgressBand::for_progress(100), ProgressBand::High);
    }

    #[test]
    fn bars_carry_goal_progress() {
        let mut goal = Goal::new("u1", "Ship it");
        goal.add_milestone("design");
        let id = goal.add_milestone("build");
        goal.toggle_milestone(&id).unwrap();

        let bars = goal_progress_bars(&[goal]);
        assert_eq!(bars[0].progress, 50);
        assert_eq!(bars[0].band, ProgressBand::Medium);
        assert_eq!((bars[0].completed_milestones, bars[0].total_milestones), (1, 2));
    }
}
