//! SQLite-backed record store.
//!
//! Records are stored as JSON payloads keyed by (user id, kind, record id).
//! Lists come back complete and unfiltered, in insertion order. The store is
//! the only writer; the aggregation engine reads snapshots returned from here.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::{data_dir, migrations};
use crate::error::{DatabaseError, Result};
use crate::records::{
    Goal, Habit, HabitLog, JournalEntry, Note, Project, Record, RecordKind, Task,
};

/// Everything a user owns, as exported to JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    pub habits: Vec<Habit>,
    pub habit_logs: Vec<HabitLog>,
    pub goals: Vec<Goal>,
    pub notes: Vec<Note>,
    pub journal_entries: Vec<JournalEntry>,
}

/// Per-user record persistence.
pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the store at `<data_dir>/lifeos.db`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("lifeos.db");
        Self::open_at(&path)
    }

    /// Open (or create) the store at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory store.
    ///
    /// # Errors
    /// Returns an error if migration fails.
    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // ── Generic record access ────────────────────────────────────────────

    /// All records of kind `T` for a user, in insertion order.
    pub fn list<T: Record>(&self, user_id: &str) -> Result<Vec<T>> {
        let mut stmt = self.conn.prepare(
            "SELECT payload FROM records
             WHERE user_id = ?1 AND kind = ?2
             ORDER BY position",
        )?;
        let rows = stmt.query_map(params![user_id, T::KIND.as_str()], |row| {
            row.get::<_, String>(0)
        })?;

        let mut records = Vec::new();
        for payload in rows {
            records.push(serde_json::from_str(&payload?)?);
        }
        Ok(records)
    }

    pub fn get<T: Record>(&self, user_id: &str, id: &str) -> Result<Option<T>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM records WHERE user_id = ?1 AND kind = ?2 AND id = ?3",
                params![user_id, T::KIND.as_str(), id],
                |row| row.get(0),
            )
            .optional()?;
        payload
            .map(|p| serde_json::from_str(&p))
            .transpose()
            .map_err(Into::into)
    }

    fn exists(&self, kind: RecordKind, user_id: &str, id: &str) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM records WHERE user_id = ?1 AND kind = ?2 AND id = ?3",
                params![user_id, kind.as_str(), id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Insert or replace a record by id, refreshing its timestamps.
    ///
    /// New records are appended to the end of the user's list; replacements
    /// keep their position.
    pub fn upsert<T: Record>(&self, record: &mut T) -> Result<()> {
        let created = !self.exists(T::KIND, record.user_id(), record.id())?;
        record.touch(Utc::now(), created);
        let payload = serde_json::to_string(&*record)?;

        if created {
            self.conn.execute(
                "INSERT INTO records (user_id, kind, id, payload, position)
                 VALUES (?1, ?2, ?3, ?4,
                    (SELECT COALESCE(MAX(position), 0) + 1 FROM records
                     WHERE user_id = ?1 AND kind = ?2))",
                params![record.user_id(), T::KIND.as_str(), record.id(), payload],
            )?;
        } else {
            self.conn.execute(
                "UPDATE records SET payload = ?4
                 WHERE user_id = ?1 AND kind = ?2 AND id = ?3",
                params![record.user_id(), T::KIND.as_str(), record.id(), payload],
            )?;
        }
        tracing::debug!(kind = %T::KIND, id = record.id(), created, "saved record");
        Ok(())
    }

    /// Delete a record by id. Returns false when nothing matched.
    pub fn delete<T: Record>(&self, user_id: &str, id: &str) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM records WHERE user_id = ?1 AND kind = ?2 AND id = ?3",
            params![user_id, T::KIND.as_str(), id],
        )?;
        if deleted > 0 {
            tracing::debug!(kind = %T::KIND, id, "deleted record");
        }
        Ok(deleted > 0)
    }

    // ── Tasks and projects ───────────────────────────────────────────────

    pub fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        self.list(user_id)
    }

    pub fn list_tasks_by_project(&self, user_id: &str, project_id: &str) -> Result<Vec<Task>> {
        Ok(self
            .list_tasks(user_id)?
            .into_iter()
            .filter(|task| task.project_id.as_deref() == Some(project_id))
            .collect())
    }

    pub fn save_task(&self, task: &mut Task) -> Result<()> {
        self.upsert(task)
    }

    pub fn delete_task(&self, user_id: &str, task_id: &str) -> Result<bool> {
        self.delete::<Task>(user_id, task_id)
    }

    pub fn list_projects(&self, user_id: &str) -> Result<Vec<Project>> {
        self.list(user_id)
    }

    pub fn save_project(&self, project: &mut Project) -> Result<()> {
        self.upsert(project)
    }

    /// Delete a project and detach its tasks.
    pub fn delete_project(&self, user_id: &str, project_id: &str) -> Result<bool> {
        let tx = self.conn.unchecked_transaction()?;
        if !self.delete::<Project>(user_id, project_id)? {
            return Ok(false);
        }
        for mut task in self.list_tasks_by_project(user_id, project_id)? {
            task.project_id = None;
            self.upsert(&mut task)?;
        }
        tx.commit()?;
        Ok(true)
    }

    // ── Habits ───────────────────────────────────────────────────────────

    pub fn list_habits(&self, user_id: &str) -> Result<Vec<Habit>> {
        self.list(user_id)
    }

    pub fn save_habit(&self, habit: &mut Habit) -> Result<()> {
        self.upsert(habit)
    }

    /// Delete a habit together with all of its logs.
    pub fn delete_habit(&self, user_id: &str, habit_id: &str) -> Result<bool> {
        let tx = self.conn.unchecked_transaction()?;
        if !self.delete::<Habit>(user_id, habit_id)? {
            return Ok(false);
        }
        for log in self.list_habit_logs(user_id)? {
            if log.habit_id == habit_id {
                self.delete::<HabitLog>(user_id, &log.id)?;
            }
        }
        tx.commit()?;
        Ok(true)
    }

    pub fn list_habit_logs(&self, user_id: &str) -> Result<Vec<HabitLog>> {
        self.list(user_id)
    }

    /// Logs for one habit, optionally limited to an inclusive date range.
    pub fn list_habit_logs_for(
        &self,
        user_id: &str,
        habit_id: &str,
        range: Option<crate::dates::DateRange>,
    ) -> Result<Vec<HabitLog>> {
        Ok(self
            .list_habit_logs(user_id)?
            .into_iter()
            .filter(|log| log.habit_id == habit_id)
            .filter(|log| range.map_or(true, |r| r.contains(log.date)))
            .collect())
    }

    /// Save a habit log, replacing any existing log for the same habit and day.
    ///
    /// The replacement takes over the existing log's id so a (habit, date)
    /// pair never has two rows. Notes on the existing log are kept unless
    /// the replacement carries its own.
    pub fn upsert_habit_log(&self, log: &mut HabitLog) -> Result<()> {
        let existing = self
            .list_habit_logs(&log.user_id)?
            .into_iter()
            .find(|l| l.habit_id == log.habit_id && l.date == log.date);
        if let Some(existing) = existing {
            if log.notes.is_none() {
                log.notes = existing.notes;
            }
            if existing.id != log.id {
                tracing::debug!(habit_id = %log.habit_id, date = %log.date, "replacing habit log");
                log.id = existing.id;
            }
        }
        self.upsert(log)
    }

    // ── Goals ────────────────────────────────────────────────────────────

    pub fn list_goals(&self, user_id: &str) -> Result<Vec<Goal>> {
        self.list(user_id)
    }

    /// Save a goal, deriving progress from its milestones when it has any.
    pub fn upsert_goal(&self, goal: &mut Goal) -> Result<()> {
        if !goal.milestones().is_empty() {
            goal.recompute_progress();
        }
        self.upsert(goal)
    }

    pub fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<bool> {
        self.delete::<Goal>(user_id, goal_id)
    }

    // ── Notes and journal ────────────────────────────────────────────────

    pub fn list_notes(&self, user_id: &str) -> Result<Vec<Note>> {
        self.list(user_id)
    }

    pub fn save_note(&self, note: &mut Note) -> Result<()> {
        self.upsert(note)
    }

    pub fn delete_note(&self, user_id: &str, note_id: &str) -> Result<bool> {
        self.delete::<Note>(user_id, note_id)
    }

    pub fn list_journal_entries(&self, user_id: &str) -> Result<Vec<JournalEntry>> {
        self.list(user_id)
    }

    pub fn save_journal_entry(&self, entry: &mut JournalEntry) -> Result<()> {
        self.upsert(entry)
    }

    pub fn delete_journal_entry(&self, user_id: &str, entry_id: &str) -> Result<bool> {
        self.delete::<JournalEntry>(user_id, entry_id)
    }

    // ── Export ───────────────────────────────────────────────────────────

    pub fn export_user_data(&self, user_id: &str) -> Result<UserData> {
        Ok(UserData {
            tasks: self.list_tasks(user_id)?,
            projects: self.list_projects(user_id)?,
            habits: self.list_habits(user_id)?,
            habit_logs: self.list_habit_logs(user_id)?,
            goals: self.list_goals(user_id)?,
            notes: self.list_notes(user_id)?,
            journal_entries: self.list_journal_entries(user_id)?,
        })
    }

    // ── Key-value state ──────────────────────────────────────────────────

    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?)
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn lists_are_per_user_and_ordered() {
        let store = RecordStore::open_memory().unwrap();
        for title in ["first", "second", "third"] {
            store.save_task(&mut Task::new("u1", title)).unwrap();
        }
        store.save_task(&mut Task::new("u2", "other")).unwrap();

        let titles: Vec<String> = store
            .list_tasks("u1")
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
        assert_eq!(store.list_tasks("u2").unwrap().len(), 1);
        assert!(store.list_tasks("nobody").unwrap().is_empty());
    }

    #[test]
    fn update_keeps_position_and_created_at() {
        let store = RecordStore::open_memory().unwrap();
        let mut a = Task::new("u1", "a");
        store.save_task(&mut a).unwrap();
        store.save_task(&mut Task::new("u1", "b")).unwrap();
        let created = a.created_at;

        a.title = "a2".to_string();
        store.save_task(&mut a).unwrap();

        let tasks = store.list_tasks("u1").unwrap();
        assert_eq!(tasks[0].title, "a2");
        assert_eq!(tasks[0].created_at, created);
        assert!(tasks[0].updated_at >= created);
    }

    #[test]
    fn delete_reports_missing() {
        let store = RecordStore::open_memory().unwrap();
        let mut note = Note::new("u1", "n", "body");
        store.save_note(&mut note).unwrap();
        assert!(store.delete_note("u1", &note.id).unwrap());
        assert!(!store.delete_note("u1", &note.id).unwrap());
    }

    #[test]
    fn habit_log_upsert_replaces_same_day() {
        let store = RecordStore::open_memory().unwrap();
        let mut first = HabitLog::new("u1", "h1", day(2024, 5, 1), false);
        store.upsert_habit_log(&mut first).unwrap();

        let mut second = HabitLog::new("u1", "h1", day(2024, 5, 1), true);
        store.upsert_habit_log(&mut second).unwrap();
        assert_eq!(second.id, first.id);

        let logs = store.list_habit_logs("u1").unwrap();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].completed);
    }

    #[test]
    fn habit_log_upsert_keeps_notes_unless_replaced() {
        let store = RecordStore::open_memory().unwrap();
        let mut noted = HabitLog::new("u1", "h1", day(2024, 5, 1), true);
        noted.notes = Some("felt slow".to_string());
        store.upsert_habit_log(&mut noted).unwrap();

        let mut toggled = HabitLog::new("u1", "h1", day(2024, 5, 1), false);
        store.upsert_habit_log(&mut toggled).unwrap();
        let logs = store.list_habit_logs("u1").unwrap();
        assert!(!logs[0].completed);
        assert_eq!(logs[0].notes.as_deref(), Some("felt slow"));

        let mut rewritten = HabitLog::new("u1", "h1", day(2024, 5, 1), true);
        rewritten.notes = Some("better".to_string());
        store.upsert_habit_log(&mut rewritten).unwrap();
        let logs = store.list_habit_logs("u1").unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].notes.as_deref(), Some("better"));
    }

    #[test]
    fn habit_logs_for_one_habit_within_range() {
        let store = RecordStore::open_memory().unwrap();
        for (habit, d) in [("h1", 1), ("h1", 5), ("h1", 9), ("h2", 5)] {
            let mut log = HabitLog::new("u1", habit, day(2024, 5, d), true);
            store.upsert_habit_log(&mut log).unwrap();
        }

        assert_eq!(store.list_habit_logs_for("u1", "h1", None).unwrap().len(), 3);
        let range = crate::dates::DateRange {
            start: day(2024, 5, 1),
            end: day(2024, 5, 5),
        };
        let dates: Vec<_> = store
            .list_habit_logs_for("u1", "h1", Some(range))
            .unwrap()
            .into_iter()
            .map(|log| log.date)
            .collect();
        assert_eq!(dates, vec![day(2024, 5, 1), day(2024, 5, 5)]);
        assert!(store.list_habit_logs_for("u2", "h1", None).unwrap().is_empty());
    }

    #[test]
    fn kv_round_trip() {
        let store = RecordStore::open_memory().unwrap();
        assert_eq!(store.kv_get("k").unwrap(), None);
        store.kv_set("k", "v1").unwrap();
        store.kv_set("k", "v2").unwrap();
        assert_eq!(store.kv_get("k").unwrap().as_deref(), Some("v2"));
        store.kv_delete("k").unwrap();
        assert_eq!(store.kv_get("k").unwrap(), None);
    }

    #[test]
    fn corrupt_payload_surfaces_as_json_error() {
        let store = RecordStore::open_memory().unwrap();
        store
            .conn()
            .execute(
                "INSERT INTO records (user_id, kind, id, payload, position)
                 VALUES ('u1', 'task', 't1', '{\"id\":\"t1\",\"dueDate\":\"nope\"}', 1)",
                [],
            )
            .unwrap();
        assert!(matches!(
            store.list_tasks("u1"),
            Err(crate::error::CoreError::Json(_))
        ));
    }
}
