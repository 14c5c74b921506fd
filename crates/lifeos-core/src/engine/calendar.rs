//! Month-grid bucketing for the calendar view.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::streak::HabitLogIndex;
use crate::dates::{self, serde_day};
use crate::error::{Result, ValidationError};
use crate::records::{HabitLog, Task};

/// One day of the month with everything that happened on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell<'a> {
    #[serde(with = "serde_day")]
    pub date: NaiveDate,
    /// Day of month, 1-based.
    pub day: u32,
    /// Tasks due on this day, in input order.
    pub tasks: Vec<&'a Task>,
    /// Completed habit logs dated this day.
    pub completed_habits: usize,
    pub is_today: bool,
}

/// A slot in the seven-column month grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarCell<'a> {
    /// Blank slot before the first of the month.
    Padding,
    Day(DayCell<'a>),
}

impl<'a> CalendarCell<'a> {
    pub fn as_day(&self) -> Option<&DayCell<'a>> {
        match self {
            CalendarCell::Padding => None,
            CalendarCell::Day(cell) => Some(cell),
        }
    }
}

/// Build the grid for `year`/`month` (1-based month).
///
/// The grid starts with one padding cell per weekday before the first of the
/// month (weeks start on Sunday) followed by a cell for every day. `reference`
/// only decides which cell is flagged as today.
///
/// # Errors
/// [`ValidationError::InvalidMonth`] when `month` is outside 1-12 or the year
/// is outside the supported calendar.
pub fn build_month_grid<'a>(
    year: i32,
    month: u32,
    tasks: &'a [Task],
    habit_logs: &[HabitLog],
    reference: NaiveDate,
) -> Result<Vec<CalendarCell<'a>>, ValidationError> {
    let leading = dates::first_weekday_of_month(year, month)?;
    let month_dates = dates::dates_in_month(year, month)?;

    let mut tasks_by_day: HashMap<NaiveDate, Vec<&'a Task>> = HashMap::new();
    for task in tasks {
        if let Some(due) = task.due_date {
            if due.year() == year && due.month() == month {
                tasks_by_day.entry(due).or_default().push(task);
            }
        }
    }
    let index = HabitLogIndex::new(habit_logs);

    let mut cells = Vec::with_capacity(leading as usize + month_dates.len());
    cells.extend((0..leading).map(|_| CalendarCell::Padding));
    for date in month_dates {
        cells.push(CalendarCell::Day(DayCell {
            date,
            day: date.day(),
            tasks: tasks_by_day.remove(&date).unwrap_or_default(),
            completed_habits: index.completed_on(date),
            is_today: date == reference,
        }));
    }

    tracing::debug!(year, month, cells = cells.len(), "built month grid");
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn due(title: &str, date: Option<NaiveDate>) -> Task {
        let mut task = Task::new("u1", title);
        task.due_date = date;
        task
    }

    #[test]
    fn thirty_day_month_starting_wednesday() {
        // April 2026 starts on a Wednesday.
        let grid = build_month_grid(2026, 4, &[], &[], day(2026, 4, 1)).unwrap();
        assert_eq!(grid.len(), 33);
        assert!(grid[..3].iter().all(|c| *c == CalendarCell::Padding));
        assert_eq!(grid[3].as_day().unwrap().day, 1);
        assert_eq!(grid[32].as_day().unwrap().day, 30);
    }

    #[test]
    fn leap_february() {
        // February 2024 starts on a Thursday and has 29 days.
        let grid = build_month_grid(2024, 2, &[], &[], day(2024, 1, 1)).unwrap();
        assert_eq!(grid.len(), 4 + 29);
        assert!(grid.iter().filter_map(CalendarCell::as_day).all(|d| !d.is_today));
    }

    #[test]
    fn month_starting_sunday_has_no_padding() {
        let grid = build_month_grid(2024, 9, &[], &[], day(2024, 9, 1)).unwrap();
        assert_eq!(grid.len(), 30);
        assert!(grid[0].as_day().unwrap().is_today);
    }

    #[test]
    fn buckets_tasks_and_completed_logs() {
        let tasks = vec![
            due("a", Some(day(2024, 9, 5))),
            due("b", Some(day(2024, 9, 5))),
            due("c", Some(day(2024, 10, 5))),
            due("d", None),
        ];
        let logs = vec![
            HabitLog::new("u1", "h1", day(2024, 9, 5), true),
            HabitLog::new("u1", "h2", day(2024, 9, 5), true),
            HabitLog::new("u1", "h3", day(2024, 9, 5), false),
            HabitLog::new("u1", "h1", day(2024, 9, 6), true),
        ];

        let grid = build_month_grid(2024, 9, &tasks, &logs, day(2024, 9, 6)).unwrap();
        let fifth = grid[4].as_day().unwrap();
        assert_eq!(fifth.date, day(2024, 9, 5));
        let titles: Vec<&str> = fifth.tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
        assert_eq!(fifth.completed_habits, 2);
        assert!(!fifth.is_today);

        let sixth = grid[5].as_day().unwrap();
        assert!(sixth.tasks.is_empty());
        assert_eq!(sixth.completed_habits, 1);
        assert!(sixth.is_today);

        let total: usize = grid.iter().filter_map(CalendarCell::as_day).map(|d| d.tasks.len()).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn invalid_month_fails_fast() {
        assert!(matches!(
            build_month_grid(2024, 13, &[], &[], day(2024, 1, 1)),
            Err(ValidationError::InvalidMonth { year: 2024, month: 13 })
        ));
        assert!(build_month_grid(2024, 0, &[], &[], day(2024, 1, 1)).is_err());
    }

    #[test]
    fn serializes_cells_with_kind_tag() {
        let tasks = vec![due("a", Some(day(2024, 9, 1)))];
        let grid = build_month_grid(2024, 9, &tasks, &[], day(2024, 9, 1)).unwrap();
        let json = serde_json::to_value(&grid[0]).unwrap();
        assert_eq!(json["kind"], "day");
        assert_eq!(json["date"], "2024-09-01");
        assert_eq!(json["isToday"], true);
        assert_eq!(json["tasks"][0]["title"], "a");
    }
}
