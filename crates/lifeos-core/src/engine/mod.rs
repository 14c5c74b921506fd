//! Aggregation engine.
//!
//! Pure functions turning record slices plus an explicit reference date into
//! derived view metrics. Nothing here reads the clock, touches storage or
//! mutates its inputs, so calling any function twice with the same arguments
//! yields the same result.

pub mod calendar;
pub mod charts;
pub mod listing;
pub mod progress;
pub mod quick_stats;
pub mod quotes;
pub mod streak;

pub use calendar::{build_month_grid, CalendarCell, DayCell};
pub use charts::{
    goal_progress_bars, habit_completion_trend, task_completion_split, DailyHabitCount,
    GoalProgressBar, ProgressBand, TaskCompletionSplit, DEFAULT_TREND_DAYS, MAX_TREND_DAYS,
};
pub use listing::{
    compare_tasks, filter_tasks, search_journal_entries, sort_journal_entries, sort_notes,
    sort_tasks, upcoming_tasks, TaskFilter, UPCOMING_TASK_LIMIT,
};
pub use progress::{compute_goal_progress, renumber_milestones};
pub use quick_stats::{compute_quick_stats, QuickStats};
pub use quotes::{quote_for_day, Quote, QUOTES};
pub use streak::{
    compute_streak, compute_streaks, habit_streak_badge, HabitLogIndex, STREAK_LOOKBACK_DAYS,
};
