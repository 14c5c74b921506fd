use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, Record, RecordKind};
use crate::engine::progress::{compute_goal_progress, renumber_milestones};
use crate::error::{Result, ValidationError};

/// A named sub-goal. `order` is display order only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalMilestone {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub order: u32,
}

impl GoalMilestone {
    pub fn new(title: impl Into<String>, order: u32) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            completed: false,
            order,
        }
    }
}

/// A goal whose progress is derived from its milestones.
///
/// Milestones are private so that every change goes through a method that
/// recomputes `progress`. Deserialization goes through [`GoalRecord`], which
/// rejects out-of-range progress and re-derives it when milestones exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "GoalRecord")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        with = "crate::dates::serde_opt_day",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    milestones: Vec<GoalMilestone>,
    #[serde(default)]
    progress: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Goal as read from storage or an import, before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoalRecord {
    id: String,
    user_id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, with = "crate::dates::serde_opt_day")]
    deadline: Option<NaiveDate>,
    #[serde(default)]
    milestones: Vec<GoalMilestone>,
    #[serde(default)]
    progress: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<GoalRecord> for Goal {
    type Error = ValidationError;

    fn try_from(record: GoalRecord) -> Result<Self, Self::Error> {
        if record.progress > 100 {
            return Err(ValidationError::ProgressOutOfRange(record.progress));
        }
        let mut goal = Goal {
            id: record.id,
            user_id: record.user_id,
            title: record.title,
            description: record.description,
            deadline: record.deadline,
            milestones: record.milestones,
            progress: record.progress as u8,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        if !goal.milestones.is_empty() {
            goal.recompute_progress();
        }
        Ok(goal)
    }
}

impl Goal {
    pub fn new(user_id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            user_id: user_id.into(),
            title: title.into(),
            description: None,
            deadline: None,
            milestones: Vec::new(),
            progress: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn milestones(&self) -> &[GoalMilestone] {
        &self.milestones
    }

    /// Milestones in display order.
    pub fn sorted_milestones(&self) -> Vec<&GoalMilestone> {
        let mut sorted: Vec<&GoalMilestone> = self.milestones.iter().collect();
        sorted.sort_by_key(|m| m.order);
        sorted
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Number of completed milestones.
    pub fn completed_milestones(&self) -> usize {
        self.milestones.iter().filter(|m| m.completed).count()
    }

    /// Overwrite `progress` from the milestone list.
    pub fn recompute_progress(&mut self) {
        self.progress = compute_goal_progress(&self.milestones);
    }

    /// Set progress by hand. Only allowed while the goal has no milestones.
    ///
    /// # Errors
    /// [`ValidationError::ProgressDerived`] when milestones exist,
    /// [`ValidationError::ProgressOutOfRange`] above 100.
    pub fn set_progress(&mut self, progress: u32) -> Result<(), ValidationError> {
        if !self.milestones.is_empty() {
            return Err(ValidationError::ProgressDerived {
                goal_id: self.id.clone(),
            });
        }
        if progress > 100 {
            return Err(ValidationError::ProgressOutOfRange(progress));
        }
        self.progress = progress as u8;
        Ok(())
    }

    /// Replace all milestones, renumbering them by position.
    pub fn set_milestones(&mut self, milestones: Vec<GoalMilestone>) {
        self.milestones = milestones;
        renumber_milestones(&mut self.milestones);
        self.recompute_progress();
    }

    /// Append a milestone at the end and return its id.
    pub fn add_milestone(&mut self, title: impl Into<String>) -> String {
        let milestone = GoalMilestone::new(title, self.milestones.len() as u32);
        let id = milestone.id.clone();
        self.milestones.push(milestone);
        self.recompute_progress();
        id
    }

    /// Flip a milestone's completed flag; returns the new state.
    ///
    /// # Errors
    /// [`ValidationError::NotFound`] when no milestone has `milestone_id`.
    pub fn toggle_milestone(&mut self, milestone_id: &str) -> Result<bool, ValidationError> {
        let milestone = self
            .milestones
            .iter_mut()
            .find(|m| m.id == milestone_id)
            .ok_or_else(|| ValidationError::NotFound {
                kind: "milestone",
                id: milestone_id.to_string(),
            })?;
        milestone.completed = !milestone.completed;
        let completed = milestone.completed;
        self.recompute_progress();
        Ok(completed)
    }

    /// Remove a milestone and renumber the rest densely from zero.
    ///
    /// # Errors
    /// [`ValidationError::NotFound`] when no milestone has `milestone_id`.
    pub fn remove_milestone(&mut self, milestone_id: &str) -> Result<GoalMilestone, ValidationError> {
        let index = self
            .milestones
            .iter()
            .position(|m| m.id == milestone_id)
            .ok_or_else(|| ValidationError::NotFound {
                kind: "milestone",
                id: milestone_id.to_string(),
            })?;
        let removed = self.milestones.remove(index);
        renumber_milestones(&mut self.milestones);
        self.recompute_progress();
        Ok(removed)
    }
}

impl Record for Goal {
    const KIND: RecordKind = RecordKind::Goal;

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn touch(&mut self, now: DateTime<Utc>, created: bool) {
        if created {
            self.created_at = now;
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal_with(titles: &[&str]) -> Goal {
        let mut goal = Goal::new("u1", "Run a marathon");
        for title in titles {
            goal.add_milestone(*title);
        }
        goal
    }

    #[test]
    fn toggling_recomputes_progress() {
        let mut goal = goal_with(&["5k", "10k", "half"]);
        assert_eq!(goal.progress(), 0);

        let first = goal.milestones()[0].id.clone();
        assert!(goal.toggle_milestone(&first).unwrap());
        assert_eq!(goal.progress(), 33);

        assert!(!goal.toggle_milestone(&first).unwrap());
        assert_eq!(goal.progress(), 0);
    }

    #[test]
    fn removal_renumbers_and_recomputes() {
        let mut goal = goal_with(&["a", "b", "c", "d"]);
        let ids: Vec<String> = goal.milestones().iter().map(|m| m.id.clone()).collect();
        goal.toggle_milestone(&ids[3]).unwrap();
        assert_eq!(goal.progress(), 25);

        goal.remove_milestone(&ids[1]).unwrap();
        let orders: Vec<u32> = goal.milestones().iter().map(|m| m.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(goal.milestones()[1].title, "c");
        assert_eq!(goal.progress(), 33);

        goal.remove_milestone(&ids[3]).unwrap();
        assert_eq!(goal.progress(), 0);
    }

    #[test]
    fn removing_last_milestone_resets_progress() {
        let mut goal = goal_with(&["only"]);
        let id = goal.milestones()[0].id.clone();
        goal.toggle_milestone(&id).unwrap();
        assert_eq!(goal.progress(), 100);

        goal.remove_milestone(&id).unwrap();
        assert!(goal.milestones().is_empty());
        assert_eq!(goal.progress(), 0);
    }

    #[test]
    fn unknown_milestone_is_reported() {
        let mut goal = goal_with(&["a"]);
        assert!(matches!(
            goal.toggle_milestone("missing"),
            Err(ValidationError::NotFound { .. })
        ));
        assert!(goal.remove_milestone("missing").is_err());
    }

    #[test]
    fn manual_progress_only_without_milestones() {
        let mut goal = Goal::new("u1", "Learn Rust");
        goal.set_progress(40).unwrap();
        assert_eq!(goal.progress(), 40);
        assert!(matches!(
            goal.set_progress(101),
            Err(ValidationError::ProgressOutOfRange(101))
        ));

        goal.add_milestone("read the book");
        assert!(matches!(
            goal.set_progress(50),
            Err(ValidationError::ProgressDerived { .. })
        ));
        assert_eq!(goal.progress(), 0);
    }

    #[test]
    fn deserialized_progress_is_rederived_from_milestones() {
        let json = r#"{
            "id": "g1", "userId": "u1", "title": "Stale",
            "milestones": [{"id": "m1", "title": "only", "completed": true, "order": 0}],
            "progress": 40,
            "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"
        }"#;
        let goal: Goal = serde_json::from_str(json).unwrap();
        assert_eq!(goal.progress(), 100);
        assert_eq!(serde_json::to_value(&goal).unwrap()["progress"], 100);
    }

    #[test]
    fn deserialized_manual_progress_is_kept_but_bounded() {
        let manual = r#"{
            "id": "g1", "userId": "u1", "title": "Manual", "progress": 40,
            "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"
        }"#;
        assert_eq!(serde_json::from_str::<Goal>(manual).unwrap().progress(), 40);

        let over = manual.replace("40", "250");
        let err = serde_json::from_str::<Goal>(&over).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn sorted_milestones_follow_order_not_position() {
        let mut goal = Goal::new("u1", "g");
        let mut first = GoalMilestone::new("second", 0);
        first.order = 7;
        let second = GoalMilestone::new("first", 0);
        goal.milestones = vec![first, second];

        let titles: Vec<&str> = goal.sorted_milestones().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }
}
