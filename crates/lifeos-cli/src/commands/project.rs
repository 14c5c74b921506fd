//! Project management commands for CLI.

use clap::Subcommand;
use lifeos_core::Project;

use super::{not_found, open_session, print_json, CmdResult};

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a new project
    Create {
        /// Project name
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Display colour, e.g. "#3b82f6"
        #[arg(long)]
        color: Option<String>,
    },
    /// List all projects
    List,
    /// Delete a project; its tasks are kept without a project
    Delete {
        /// Project ID
        id: String,
    },
}

pub fn run(action: ProjectAction) -> CmdResult {
    let (store, session) = open_session()?;

    match action {
        ProjectAction::Create {
            name,
            description,
            color,
        } => {
            let mut project = Project::new(&session.id, name);
            project.description = description;
            project.color = color;
            store.save_project(&mut project)?;
            print_json(&project)?;
        }
        ProjectAction::List => {
            print_json(&store.list_projects(&session.id)?)?;
        }
        ProjectAction::Delete { id } => {
            if !store.delete_project(&session.id, &id)? {
                return Err(not_found("project", &id).into());
            }
            println!("deleted project {id}");
        }
    }
    Ok(())
}
