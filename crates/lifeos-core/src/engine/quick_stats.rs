//! Dashboard quick-stat counters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::streak::HabitLogIndex;
use crate::records::{Goal, Habit, HabitLog, Task};

/// The three dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickStats {
    /// Tasks due on the reference date, plus tasks with no due date.
    pub tasks_today: usize,
    /// Longest current streak across all habits.
    pub max_streak: u32,
    /// Goals strictly between 0% and 100%.
    pub goals_in_progress: usize,
}

/// Tasks counted as "today": due on `reference` or undated.
pub fn is_task_for_today(task: &Task, reference: NaiveDate) -> bool {
    task.due_date.map_or(true, |due| due == reference)
}

/// Whether a goal is started but not finished.
pub fn is_goal_in_progress(goal: &Goal) -> bool {
    let progress = goal.progress();
    progress > 0 && progress < 100
}

pub fn compute_quick_stats(
    tasks: &[Task],
    habits: &[Habit],
    habit_logs: &[HabitLog],
    goals: &[Goal],
    reference: NaiveDate,
) -> QuickStats {
    let index = HabitLogIndex::new(habit_logs);
    QuickStats {
        tasks_today: tasks
            .iter()
            .filter(|task| is_task_for_today(task, reference))
            .count(),
        max_streak: habits
            .iter()
            .map(|habit| index.streak(&habit.id, reference))
            .max()
            .unwrap_or(0),
        goals_in_progress: goals.iter().filter(|goal| is_goal_in_progress(goal)).count(),
    }
}
