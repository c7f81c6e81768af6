//! Entity rows as stored in SQLite and returned over the API.
//!
//! Timestamps are SQLite `datetime('now')` text (`YYYY-MM-DD HH:MM:SS`, UTC).
//! An entity is active iff `archived_at` is `None`.

use serde::{Deserialize, Serialize};

use crate::lifecycle::Lifecycle;

/// Default color for a newly created project status (neutral gray).
pub const DEFAULT_STATUS_COLOR: &str = "#6b7280";

/// A registered user. One GitHub identity maps to exactly one row
/// (upsert keyed on `github_id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub github_id: String,
    pub username: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub api_key: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A minimal captured thought — the entry point of the lineage chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spark {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
    pub archived_at: Option<String>,
}

impl Spark {
    pub fn is_active(&self) -> bool {
        Lifecycle::of(self.archived_at.as_deref()).is_active()
    }
}

/// An expanded spark. `spark_origin_id` is a weak backward reference:
/// deleting the origin spark clears it, never the idea.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idea {
    pub id: String,
    pub user_id: String,
    pub spark_origin_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub user_story: Option<String>,
    pub tech_stack: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub archived_at: Option<String>,
}

impl Idea {
    pub fn is_active(&self) -> bool {
        Lifecycle::of(self.archived_at.as_deref()).is_active()
    }
}

/// A committed idea with workflow statuses and tasks, optionally linked
/// to a GitHub repository. `idea_origin_id` follows the same weak-reference
/// rule as `Idea::spark_origin_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub idea_origin_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub user_story: Option<String>,
    pub tech_stack: Option<String>,
    pub github_repo_url: Option<String>,
    pub github_repo_name: Option<String>,
    pub github_repo_owner: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub archived_at: Option<String>,
}

impl Project {
    pub fn is_active(&self) -> bool {
        Lifecycle::of(self.archived_at.as_deref()).is_active()
    }
}

/// One step of a per-project workflow. `sort_order` is caller-assigned;
/// neither name nor order uniqueness is enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectStatus {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub color: String,
    pub sort_order: i64,
}

/// A unit of work within a project. Deleting its status clears
/// `status_id`, never the task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub status_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub branch_name: Option<String>,
    pub sort_order: i64,
    pub created_at: String,
    pub updated_at: String,
}
