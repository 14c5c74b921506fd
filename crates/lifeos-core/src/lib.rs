//! # LifeOS Core Library
//!
//! Core logic for LifeOS, a personal organizer for tasks, projects, habits,
//! goals, notes and journal entries. The `lifeos` CLI is a thin layer over
//! this crate.
//!
//! ## Architecture
//!
//! - **Records**: plain per-user data types with client-generated ids
//! - **Engine**: pure aggregation over record snapshots and an explicit
//!   reference date (streaks, goal progress, the month grid, quick stats,
//!   chart series)
//! - **Storage**: SQLite record store and TOML configuration
//! - **Auth**: local accounts with Argon2 password hashes
//!
//! ## Key Components
//!
//! - [`RecordStore`]: per-user record persistence
//! - [`compute_streak`], [`compute_goal_progress`], [`build_month_grid`],
//!   [`compute_quick_stats`]: the view metrics
//! - [`Config`]: application configuration management
//! - [`Accounts`]: registration, login and the current session

pub mod auth;
pub mod dates;
pub mod engine;
pub mod error;
pub mod records;
pub mod storage;

pub use auth::{Accounts, MIN_PASSWORD_LENGTH};
pub use dates::{parse_day, CalendarView, DateRange};
pub use engine::{
    build_month_grid, compute_goal_progress, compute_quick_stats, compute_streak,
    compute_streaks, CalendarCell, DayCell, QuickStats,
};
pub use error::{AuthError, ConfigError, CoreError, DatabaseError, ValidationError};
pub use records::{
    Goal, GoalMilestone, Habit, HabitFrequency, HabitLog, JournalEntry, Note, ProfileUpdate,
    Project, Session, Task,
};
pub use storage::{Config, RecordStore, UserData};
