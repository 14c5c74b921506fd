use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, Record, RecordKind};

/// How often a habit is meant to be performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitFrequency {
    #[default]
    Daily,
    Weekly,
}

impl std::str::FromStr for HabitFrequency {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            other => Err(crate::error::ValidationError::InvalidValue {
                field: "frequency".to_string(),
                message: format!("unknown frequency '{other}' (expected daily or weekly)"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub frequency: HabitFrequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            user_id: user_id.into(),
            name: name.into(),
            description: None,
            frequency: HabitFrequency::Daily,
            color: None,
            icon: None,
            created_at: Utc::now(),
        }
    }
}

impl Record for Habit {
    const KIND: RecordKind = RecordKind::Habit;

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
    }
}

/// One day's outcome for a habit. At most one per (habit, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitLog {
    pub id: String,
    pub habit_id: String,
    pub user_id: String,
    #[serde(with = "crate::dates::serde_day")]
    pub date: NaiveDate,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl HabitLog {
    pub fn new(
        user_id: impl Into<String>,
        habit_id: impl Into<String>,
        date: NaiveDate,
        completed: bool,
    ) -> Self {
        Self {
            id: new_id(),
            habit_id: habit_id.into(),
            user_id: user_id.into(),
            date,
            completed,
            notes: None,
        }
    }
}

impl Record for HabitLog {
    const KIND: RecordKind = RecordKind::HabitLog;

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }
}
