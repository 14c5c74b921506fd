//! Task management commands for CLI.

use clap::Subcommand;
use lifeos_core::engine::{filter_tasks, sort_tasks, TaskFilter};
use lifeos_core::Task;
use serde::Serialize;

use super::{
    non_empty, not_found, open_session, parse_optional_day, print_json, reference_date, CmdResult,
};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Task title
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Due date as YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
        /// Project id to file the task under
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// List tasks, incomplete and soonest-due first
    List {
        /// Only tasks in this project
        #[arg(long)]
        project: Option<String>,
        /// Include completed tasks
        #[arg(long)]
        all: bool,
        /// Reference date for the overdue flag (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Update fields of an existing task
    Update {
        /// Task ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Due date as YYYY-MM-DD; an empty string clears it
        #[arg(long)]
        due: Option<String>,
        /// Project id; an empty string clears it
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Mark complete (true) or incomplete (false)
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskRow<'a> {
    #[serde(flatten)]
    task: &'a Task,
    overdue: bool,
}


pub fn run(action: TaskAction) -> CmdResult {
    let (store, session) = open_session()?;

    match action {
        TaskAction::Create {
            title,
            description,
            due,
            project,
            category,
        } => {
            let mut task = Task::new(&session.id, title);
            task.description = description;
            task.due_date = parse_optional_day(due.as_deref())?;
            task.project_id = project;
            task.category = category;
            store.save_task(&mut task)?;
            print_json(&task)?;
        }
        TaskAction::List { project, all, date } => {
            let reference = reference_date(date.as_deref())?;
            let tasks = store.list_tasks(&session.id)?;
            let filter = TaskFilter {
                project_id: project,
                show_completed: all,
            };
            let mut visible = filter_tasks(&tasks, &filter);
            sort_tasks(&mut visible);
            let rows: Vec<TaskRow> = visible
                .into_iter()
                .map(|task| TaskRow {
                    task,
                    overdue: task.is_overdue(reference),
                })
                .collect();
            print_json(&rows)?;
        }
        TaskAction::Update {
            id,
            title,
            description,
            due,
            project,
            category,
            completed,
        } => {
            let mut task: Task = store
                .get(&session.id, &id)?
                .ok_or_else(|| not_found("task", &id))?;
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(description) = description {
                task.description = non_empty(description);
            }
            if let Some(due) = due {
                task.due_date = parse_optional_day(non_empty(due).as_deref())?;
            }
            if let Some(project) = project {
                task.project_id = non_empty(project);
            }
            if let Some(category) = category {
                task.category = non_empty(category);
            }
            if let Some(completed) = completed {
                task.completed = completed;
            }
            store.save_task(&mut task)?;
            print_json(&task)?;
        }
        TaskAction::Delete { id } => {
            if !store.delete_task(&session.id, &id)? {
                return Err(not_found("task", &id).into());
            }
            println!("deleted task {id}");
        }
    }
    Ok(())
}
