//! Goal and milestone commands for CLI.

use clap::Subcommand;
use lifeos_core::{Goal, RecordStore, Session};

use super::{non_empty, not_found, open_session, parse_optional_day, print_json, CmdResult};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Create a new goal
    Create {
        /// Goal title
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Deadline as YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,
        /// Milestone title; repeat for several
        #[arg(long = "milestone")]
        milestones: Vec<String>,
        /// Manual progress (0-100) for a goal without milestones
        #[arg(long)]
        progress: Option<u32>,
    },
    /// Update fields of an existing goal
    Update {
        /// Goal ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// An empty string clears it
        #[arg(long)]
        description: Option<String>,
        /// Deadline as YYYY-MM-DD; an empty string clears it
        #[arg(long)]
        deadline: Option<String>,
        /// Manual progress (0-100) for a goal without milestones
        #[arg(long)]
        progress: Option<u32>,
    },
    /// List all goals
    List,
    /// Append a milestone to a goal
    MilestoneAdd {
        /// Goal ID
        goal_id: String,
        /// Milestone title
        title: String,
    },
    /// Flip a milestone between done and not done
    MilestoneToggle {
        /// Goal ID
        goal_id: String,
        /// Milestone ID
        milestone_id: String,
    },
    /// Remove a milestone from a goal
    MilestoneRemove {
        /// Goal ID
        goal_id: String,
        /// Milestone ID
        milestone_id: String,
    },
    /// Delete a goal
    Delete {
        /// Goal ID
        id: String,
    },
}

fn load_goal(
    store: &RecordStore,
    session: &Session,
    goal_id: &str,
) -> Result<Goal, Box<dyn std::error::Error>> {
    Ok(store
        .get(&session.id, goal_id)?
        .ok_or_else(|| not_found("goal", goal_id))?)
}

pub fn run(action: GoalAction) -> CmdResult {
    let (store, session) = open_session()?;

    match action {
        GoalAction::Create {
            title,
            description,
            deadline,
            milestones,
            progress,
        } => {
            let mut goal = Goal::new(&session.id, title);
            goal.description = description;
            goal.deadline = parse_optional_day(deadline.as_deref())?;
            for milestone in milestones {
                goal.add_milestone(milestone);
            }
            if let Some(progress) = progress {
                goal.set_progress(progress)?;
            }
            store.upsert_goal(&mut goal)?;
            print_json(&goal)?;
        }
        GoalAction::Update {
            id,
            title,
            description,
            deadline,
            progress,
        } => {
            let mut goal = load_goal(&store, &session, &id)?;
            if let Some(title) = title {
                goal.title = title;
            }
            if let Some(description) = description {
                goal.description = non_empty(description);
            }
            if let Some(deadline) = deadline {
                goal.deadline = parse_optional_day(non_empty(deadline).as_deref())?;
            }
            if let Some(progress) = progress {
                goal.set_progress(progress)?;
            }
            store.upsert_goal(&mut goal)?;
            print_json(&goal)?;
        }
        GoalAction::List => {
            print_json(&store.list_goals(&session.id)?)?;
        }
        GoalAction::MilestoneAdd { goal_id, title } => {
            let mut goal = load_goal(&store, &session, &goal_id)?;
            goal.add_milestone(title);
            store.upsert_goal(&mut goal)?;
            print_json(&goal)?;
        }
        GoalAction::MilestoneToggle {
            goal_id,
            milestone_id,
        } => {
            let mut goal = load_goal(&store, &session, &goal_id)?;
            goal.toggle_milestone(&milestone_id)?;
            store.upsert_goal(&mut goal)?;
            print_json(&goal)?;
        }
        GoalAction::MilestoneRemove {
            goal_id,
            milestone_id,
        } => {
            let mut goal = load_goal(&store, &session, &goal_id)?;
            goal.remove_milestone(&milestone_id)?;
            store.upsert_goal(&mut goal)?;
            print_json(&goal)?;
        }
        GoalAction::Delete { id } => {
            if !store.delete_goal(&session.id, &id)? {
                return Err(not_found("goal", &id).into());
            }
            println!("deleted goal {id}");
        }
    }
    Ok(())
}
