//! Plain record types persisted per user.
//!
//! Every record is owned by exactly one user and identified by a
//! client-generated id. The [`Record`] trait is the seam the record store uses
//! to persist any kind generically.

mod goal;
mod habit;
mod journal;
mod note;
mod project;
mod task;
mod user;

pub use goal::{Goal, GoalMilestone};
pub use habit::{Habit, HabitFrequency, HabitLog};
pub use journal::JournalEntry;
pub use note::Note;
pub use project::Project;
pub use task::Task;
pub use user::{ProfileUpdate, Session};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Kind tag under which a record is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Task,
    Project,
    Habit,
    HabitLog,
    Goal,
    JournalEntry,
    Note,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Task => "task",
            RecordKind::Project => "project",
            RecordKind::Habit => "habit",
            RecordKind::HabitLog => "habit_log",
            RecordKind::Goal => "goal",
            RecordKind::JournalEntry => "journal_entry",
            RecordKind::Note => "note",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-owned record that can be stored by kind.
pub trait Record: Serialize + DeserializeOwned {
    const KIND: RecordKind;

    fn id(&self) -> &str;

    fn user_id(&self) -> &str;

    /// Refresh timestamps before a write. `created` is true for first inserts.
    fn touch(&mut self, _now: DateTime<Utc>, _created: bool) {}
}

/// Fresh client-side record id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
