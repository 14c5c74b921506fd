//! Calendar commands for CLI.

use chrono::Datelike;
use clap::Subcommand;
use lifeos_core::dates::{date_range_for_view, DateRange};
use lifeos_core::engine::{upcoming_tasks, UPCOMING_TASK_LIMIT};
use lifeos_core::{build_month_grid, CalendarView, Config, Habit, HabitLog, Task};
use serde::Serialize;

use super::{not_found, open_session, print_json, reference_date, CmdResult};

#[derive(Subcommand)]
pub enum CalendarAction {
    /// Month grid: leading blanks then one cell per day
    Month {
        /// Year (default: year of the reference date)
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12 (default: month of the reference date)
        #[arg(long)]
        month: Option<u32>,
        /// Reference date marking "today" (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Tasks and habit logs in the day, week or month around a date
    Range {
        /// day, week or month (default: calendar.default_view)
        #[arg(long)]
        view: Option<CalendarView>,
        /// Date inside the range (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
        /// Only this habit's logs
        #[arg(long)]
        habit: Option<String>,
    },
    /// Incomplete dated tasks, soonest first
    Upcoming {
        #[arg(long, default_value_t = UPCOMING_TASK_LIMIT)]
        limit: usize,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RangeView<'a> {
    view: CalendarView,
    #[serde(flatten)]
    range: DateRange,
    tasks: Vec<&'a Task>,
    habit_logs: Vec<HabitLog>,
}

pub fn run(action: CalendarAction) -> CmdResult {
    let (store, session) = open_session()?;

    match action {
        CalendarAction::Month { year, month, date } => {
            let reference = reference_date(date.as_deref())?;
            let year = year.unwrap_or_else(|| reference.year());
            let month = month.unwrap_or_else(|| reference.month());
            let tasks = store.list_tasks(&session.id)?;
            let logs = store.list_habit_logs(&session.id)?;
            let grid = build_month_grid(year, month, &tasks, &logs, reference)?;
            print_json(&grid)?;
        }
        CalendarAction::Range { view, date, habit } => {
            let view = match view {
                Some(view) => view,
                None => Config::load()?.calendar.default_view,
            };
            let reference = reference_date(date.as_deref())?;
            let range = date_range_for_view(view, reference);
            let tasks = store.list_tasks(&session.id)?;
            let habit_logs = match habit.as_deref() {
                Some(habit_id) => {
                    if store.get::<Habit>(&session.id, habit_id)?.is_none() {
                        return Err(not_found("habit", habit_id).into());
                    }
                    store.list_habit_logs_for(&session.id, habit_id, Some(range))?
                }
                None => store
                    .list_habit_logs(&session.id)?
                    .into_iter()
                    .filter(|log| range.contains(log.date))
                    .collect(),
            };
            print_json(&RangeView {
                view,
                range,
                tasks: tasks
                    .iter()
                    .filter(|task| task.due_date.is_some_and(|due| range.contains(due)))
                    .collect(),
                habit_logs,
            })?;
        }
        CalendarAction::Upcoming { limit } => {
            let tasks = store.list_tasks(&session.id)?;
            print_json(&upcoming_tasks(&tasks, limit))?;
        }
    }
    Ok(())
}
