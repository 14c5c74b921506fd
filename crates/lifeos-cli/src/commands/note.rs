//! Note commands for CLI.

use clap::Subcommand;
use lifeos_core::engine::sort_notes;
use lifeos_core::Note;

use super::{not_found, open_session, parse_tags, print_json, CmdResult};

#[derive(Subcommand)]
pub enum NoteAction {
    /// Create a note
    Create {
        /// Note title
        title: String,
        /// Note body
        content: String,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        color: Option<String>,
        /// Keep the note at the top of the list
        #[arg(long)]
        pinned: bool,
    },
    /// List notes, pinned first
    List,
    /// Delete a note
    Delete {
        /// Note ID
        id: String,
    },
}

pub fn run(action: NoteAction) -> CmdResult {
    let (store, session) = open_session()?;

    match action {
        NoteAction::Create {
            title,
            content,
            tags,
            color,
            pinned,
        } => {
            let mut note = Note::new(&session.id, title, content);
            note.tags = parse_tags(tags.as_deref());
            note.color = color;
            note.pinned = pinned;
            store.save_note(&mut note)?;
            print_json(&note)?;
        }
        NoteAction::List => {
            let mut notes = store.list_notes(&session.id)?;
            sort_notes(&mut notes);
            print_json(&notes)?;
        }
        NoteAction::Delete { id } => {
            if !store.delete_note(&session.id, &id)? {
                return Err(not_found("note", &id).into());
            }
            println!("deleted note {id}");
        }
    }
    Ok(())
}
