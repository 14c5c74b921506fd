//! Journal commands for CLI.

use clap::Subcommand;
use lifeos_core::engine::{search_journal_entries, sort_journal_entries};
use lifeos_core::{parse_day, JournalEntry};

use super::{
    non_empty, not_found, open_session, parse_tags, print_json, reference_date, CmdResult,
};

#[derive(Subcommand)]
pub enum JournalAction {
    /// Write a journal entry
    Create {
        /// Entry title
        title: String,
        /// Entry body
        content: String,
        #[arg(long)]
        mood: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        /// Entry date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Update fields of an existing entry
    Update {
        /// Entry ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        /// An empty string clears it
        #[arg(long)]
        mood: Option<String>,
        /// Comma-separated tags, replacing the current ones
        #[arg(long)]
        tags: Option<String>,
        /// Entry date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// List entries, newest first
    List {
        /// Case-insensitive match on title, content or tags
        #[arg(long)]
        search: Option<String>,
    },
    /// Delete a journal entry
    Delete {
        /// Entry ID
        id: String,
    },
}

pub fn run(action: JournalAction) -> CmdResult {
    let (store, session) = open_session()?;

    match action {
        JournalAction::Create {
            title,
            content,
            mood,
            tags,
            date,
        } => {
            let date = reference_date(date.as_deref())?;
            let mut entry = JournalEntry::new(&session.id, title, content, date);
            entry.mood = mood;
            entry.tags = parse_tags(tags.as_deref());
            store.save_journal_entry(&mut entry)?;
            print_json(&entry)?;
        }
        JournalAction::Update {
            id,
            title,
            content,
            mood,
            tags,
            date,
        } => {
            let mut entry: JournalEntry = store
                .get(&session.id, &id)?
                .ok_or_else(|| not_found("journal entry", &id))?;
            if let Some(title) = title {
                entry.title = title;
            }
            if let Some(content) = content {
                entry.content = content;
            }
            if let Some(mood) = mood {
                entry.mood = non_empty(mood);
            }
            if tags.is_some() {
                entry.tags = parse_tags(tags.as_deref());
            }
            if let Some(date) = date {
                entry.date = parse_day(&date)?;
            }
            store.save_journal_entry(&mut entry)?;
            print_json(&entry)?;
        }
        JournalAction::List { search } => {
            let mut entries = store.list_journal_entries(&session.id)?;
            sort_journal_entries(&mut entries);
            let matches = search_journal_entries(&entries, search.as_deref().unwrap_or(""));
            print_json(&matches)?;
        }
        JournalAction::Delete { id } => {
            if !store.delete_journal_entry(&session.id, &id)? {
                return Err(not_found("journal entry", &id).into());
            }
            println!("deleted journal entry {id}");
        }
    }
    Ok(())
}
