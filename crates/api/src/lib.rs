//! Shared API types, GitHub OAuth helpers, and SQL builders for Kindling.
//!
//! This crate is the single source of truth for all request/response types.
//! The SQL builders (behind the `backend` feature) are consumed by the Axum
//! server; the plain types are frontend-safe.

use serde::{Deserialize, Serialize};

#[cfg(feature = "backend")]
pub mod db;
pub mod oauth;
pub mod service;

// Re-export entity rows for convenience — responses return them directly.
pub use kindling_core::{Idea, Project, ProjectStatus, Spark, Task, User};

// ─── Generic responses ───────────────────────────────────────────────────────

/// Returned by `GET /api/health` — server liveness check.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Generic `{ "ok": true }` acknowledgement for deletes and archives.
#[derive(Debug, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

// ─── Sparks ──────────────────────────────────────────────────────────────────

/// Body of `POST /api/sparks`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSparkRequest {
    pub title: String,
}

/// Body of `POST /api/sparks/:id/promote` — optional fields carried onto
/// the new idea. The title is always copied from the spark.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PromoteSparkRequest {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Returned by `GET /api/sparks`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SparkListResponse {
    pub sparks: Vec<Spark>,
}

// ─── Ideas ───────────────────────────────────────────────────────────────────

/// Body of `PUT /api/ideas/:id`. Absent fields are left untouched;
/// `updated_at` is always refreshed, `archived_at` never is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateIdeaRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub user_story: Option<String>,
    #[serde(default)]
    pub tech_stack: Option<String>,
}

impl UpdateIdeaRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.notes.is_none()
            && self.user_story.is_none()
            && self.tech_stack.is_none()
    }
}

/// Body of `POST /api/ideas/:id/promote` — pending edits persisted to the
/// idea *before* the project snapshot is taken, so the project captures the
/// latest idea state.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PromoteIdeaRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub user_story: Option<String>,
    #[serde(default)]
    pub tech_stack: Option<String>,
}

impl PromoteIdeaRequest {
    /// Pending edits to flush before the snapshot, if any.
    pub fn pending_edits(&self) -> Option<UpdateIdeaRequest> {
        let edits = UpdateIdeaRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            notes: self.notes.clone(),
            user_story: self.user_story.clone(),
            tech_stack: self.tech_stack.clone(),
        };
        if edits.is_empty() { None } else { Some(edits) }
    }
}

/// Returned by `GET /api/ideas`.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdeaListResponse {
    pub ideas: Vec<Idea>,
}

// ─── Projects ────────────────────────────────────────────────────────────────

/// Body of `PUT /api/projects/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_story: Option<String>,
    #[serde(default)]
    pub tech_stack: Option<String>,
    #[serde(default)]
    pub github_repo_url: Option<String>,
    #[serde(default)]
    pub github_repo_name: Option<String>,
    #[serde(default)]
    pub github_repo_owner: Option<String>,
}

/// Returned by `GET /api/projects`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
}

// ─── Project statuses ────────────────────────────────────────────────────────

/// Body of `POST /api/projects/:id/statuses`. `sort_order` is caller-assigned
/// and not validated for uniqueness or contiguity.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateStatusRequest {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    pub sort_order: i64,
}

/// Body of `PUT /api/statuses/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i64>,
}

impl UpdateStatusRequest {
    /// Statuses have no `updated_at` column, so an all-absent body has
    /// nothing to SET — callers must not build an update from it.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.sort_order.is_none()
    }
}

/// Returned by `GET /api/projects/:id/statuses`, ordered by `sort_order`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusListResponse {
    pub statuses: Vec<ProjectStatus>,
}

// ─── Tasks ───────────────────────────────────────────────────────────────────

/// Body of `POST /api/projects/:id/tasks`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status_id: Option<String>,
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i64>,
}

/// Body of `PUT /api/tasks/:id`.
///
/// `status_id` distinguishes "absent" (unchanged) from explicit `null`
/// (move the task out of any status), hence the double `Option`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "patch_field")]
    pub status_id: Option<Option<String>>,
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i64>,
}

/// Returned by `GET /api/projects/:id/tasks`, ordered by `sort_order`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

/// Deserialize a present field (including `null`) as `Some(value)`, so a
/// defaulted outer `None` means "field absent".
fn patch_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ─── Service error ───────────────────────────────────────────────────────────

/// Framework-agnostic service error. Each variant maps to an HTTP status;
/// the server converts this into its response type.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum ServiceError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ServiceError {
    /// HTTP status code as a `u16`.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(m)
            | Self::Unauthorized(m)
            | Self::NotFound(m)
            | Self::Conflict(m)
            | Self::Internal(m) => m,
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ServiceError {}

/// JSON error shape `{ "error": "..." }` returned by all error responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}
