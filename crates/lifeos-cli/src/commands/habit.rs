//! Habit commands for CLI.

use clap::Subcommand;
use lifeos_core::engine::{habit_streak_badge, HabitLogIndex};
use lifeos_core::{Habit, HabitFrequency, HabitLog};
use serde::Serialize;

use super::{non_empty, not_found, open_session, print_json, reference_date, CmdResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Create {
        /// Habit name
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// daily or weekly
        #[arg(long, default_value = "daily")]
        frequency: HabitFrequency,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Update fields of an existing habit
    Update {
        /// Habit ID
        id: String,
        #[arg(long)]
        name: Option<String>,
        /// An empty string clears it
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        frequency: Option<HabitFrequency>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// List habits with their current streaks
    List {
        /// Reference date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Record a day's outcome for a habit, replacing any earlier log that day
    Log {
        /// Habit ID
        id: String,
        /// Day to log (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
        /// Record the day as not done
        #[arg(long)]
        missed: bool,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a habit and all of its logs
    Delete {
        /// Habit ID
        id: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HabitRow<'a> {
    #[serde(flatten)]
    habit: &'a Habit,
    streak: u32,
    streak_label: String,
    streak_fill: u8,
    completed_today: bool,
}

pub fn run(action: HabitAction) -> CmdResult {
    let (store, session) = open_session()?;

    match action {
        HabitAction::Create {
            name,
            description,
            frequency,
            color,
            icon,
        } => {
            let mut habit = Habit::new(&session.id, name);
            habit.description = description;
            habit.frequency = frequency;
            habit.color = color;
            habit.icon = icon;
            store.save_habit(&mut habit)?;
            print_json(&habit)?;
        }
        HabitAction::Update {
            id,
            name,
            description,
            frequency,
            color,
            icon,
        } => {
            let mut habit: Habit = store
                .get(&session.id, &id)?
                .ok_or_else(|| not_found("habit", &id))?;
            if let Some(name) = name {
                habit.name = name;
            }
            if let Some(description) = description {
                habit.description = non_empty(description);
            }
            if let Some(frequency) = frequency {
                habit.frequency = frequency;
            }
            if let Some(color) = color {
                habit.color = non_empty(color);
            }
            if let Some(icon) = icon {
                habit.icon = non_empty(icon);
            }
            store.save_habit(&mut habit)?;
            print_json(&habit)?;
        }
        HabitAction::List { date } => {
            let reference = reference_date(date.as_deref())?;
            let habits = store.list_habits(&session.id)?;
            let logs = store.list_habit_logs(&session.id)?;
            let index = HabitLogIndex::new(&logs);
            let rows: Vec<HabitRow> = habits
                .iter()
                .map(|habit| {
                    let streak = index.streak(&habit.id, reference);
                    let (streak_label, streak_fill) = habit_streak_badge(streak);
                    HabitRow {
                        habit,
                        streak,
                        streak_label,
                        streak_fill,
                        completed_today: index.is_completed(&habit.id, reference),
                    }
                })
                .collect();
            print_json(&rows)?;
        }
        HabitAction::Log {
            id,
            date,
            missed,
            notes,
        } => {
            if store.get::<Habit>(&session.id, &id)?.is_none() {
                return Err(not_found("habit", &id).into());
            }
            let day = reference_date(date.as_deref())?;
            let mut log = HabitLog::new(&session.id, &id, day, !missed);
            log.notes = notes;
            store.upsert_habit_log(&mut log)?;
            print_json(&log)?;
        }
        HabitAction::Delete { id } => {
            if !store.delete_habit(&session.id, &id)? {
                return Err(not_found("habit", &id).into());
            }
            println!("deleted habit {id}");
        }
    }
    Ok(())
}
