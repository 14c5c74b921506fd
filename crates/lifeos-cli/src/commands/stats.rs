//! Dashboard statistics commands for CLI.

use chrono::{Local, NaiveDate, Timelike};
use clap::Subcommand;
use lifeos_core::dates::{serde_day, TimeOfDay};
use lifeos_core::engine::{
    goal_progress_bars, habit_completion_trend, quote_for_day, task_completion_split,
    DailyHabitCount, GoalProgressBar, Quote, TaskCompletionSplit, MAX_TREND_DAYS,
};
use lifeos_core::{compute_quick_stats, Config, QuickStats};
use serde::Serialize;

use super::{open_session, print_json, reference_date, CmdResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Tasks for today, best current streak and goals in progress
    Quick {
        /// Reference date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Task split, habit trend and goal progress series
    Charts {
        /// Reference date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
        /// Habit trend length in days, 1-366 (default: dashboard.trend_days)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_TREND_DAYS)))]
        days: Option<u32>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Dashboard {
    greeting: String,
    #[serde(with = "serde_day")]
    date: NaiveDate,
    quote: Quote,
    #[serde(flatten)]
    stats: QuickStats,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Charts {
    tasks: TaskCompletionSplit,
    habit_trend: Vec<DailyHabitCount>,
    goals: Vec<GoalProgressBar>,
}

pub fn run(action: StatsAction) -> CmdResult {
    let (store, session) = open_session()?;

    match action {
        StatsAction::Quick { date } => {
            let reference = reference_date(date.as_deref())?;
            let data = store.export_user_data(&session.id)?;
            let stats = compute_quick_stats(
                &data.tasks,
                &data.habits,
                &data.habit_logs,
                &data.goals,
                reference,
            );
            let greeting = TimeOfDay::from_hour(Local::now().hour()).greeting();
            print_json(&Dashboard {
                greeting: format!("{greeting}, {}", session.name),
                date: reference,
                quote: quote_for_day(reference),
                stats,
            })?;
        }
        StatsAction::Charts { date, days } => {
            let reference = reference_date(date.as_deref())?;
            let days = match days {
                Some(days) => days,
                None => Config::load()?.dashboard.trend_days,
            };
            let data = store.export_user_data(&session.id)?;
            print_json(&Charts {
                tasks: task_completion_split(&data.tasks),
                habit_trend: habit_completion_trend(&data.habit_logs, reference, days),
                goals: goal_progress_bars(&data.goals),
            })?;
        }
    }
    Ok(())
}
