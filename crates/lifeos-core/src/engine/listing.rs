//! Filtering and ordering for the task and journal lists.

use std::cmp::Ordering;

use crate::records::{JournalEntry, Note, Task};

/// Default length of the upcoming task list.
pub const UPCOMING_TASK_LIMIT: usize = 5;

/// Which tasks a list shows.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Only tasks filed under this project; `None` shows every project.
    pub project_id: Option<String>,
    pub show_completed: bool,
}

pub fn filter_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| {
            filter
                .project_id
                .as_deref()
                .map_or(true, |project| task.project_id.as_deref() == Some(project))
        })
        .filter(|task| filter.show_completed || !task.completed)
        .collect()
}

/// List order for tasks.
///
/// Incomplete before complete; then dated tasks by due date ascending, dated
/// before undated; ties fall back to newest-created first.
pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    a.completed
        .cmp(&b.completed)
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.created_at.cmp(&a.created_at))
}

pub fn sort_tasks(tasks: &mut [&Task]) {
    tasks.sort_by(|a, b| compare_tasks(a, b));
}

/// Incomplete tasks with a due date, soonest first, at most `limit` of them.
/// Overdue tasks stay in the list.
pub fn upcoming_tasks(tasks: &[Task], limit: usize) -> Vec<&Task> {
    let mut upcoming: Vec<&Task> = tasks
        .iter()
        .filter(|task| !task.completed && task.due_date.is_some())
        .collect();
    upcoming.sort_by_key(|task| task.due_date);
    upcoming.truncate(limit);
    upcoming
}

/// Newest entry date first.
pub fn sort_journal_entries(entries: &mut [JournalEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.created_at.cmp(&a.created_at)));
}

/// Case-insensitive search over title, content and tags. A blank query matches
/// everything.
pub fn search_journal_entries<'a>(entries: &'a [JournalEntry], query: &str) -> Vec<&'a JournalEntry> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return entries.iter().collect();
    }
    entries
        .iter()
        .filter(|entry| {
            entry.title.to_lowercase().contains(&query)
                || entry.content.to_lowercase().contains(&query)
                || entry.tags.iter().any(|tag| tag.to_lowercase().contains(&query))
        })
        .collect()
}

/// Pinned notes first, then most recently updated.
pub fn sort_notes(notes: &mut [Note]) {
    notes.sort_by(|a, b| b.pinned.cmp(&a.pinned).then_with(|| b.updated_at.cmp(&a.updated_at)));
}
