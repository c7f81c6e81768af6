use axum::{
    extract::{Path, State},
    Json,
};

use kindling_api::{OkResponse, ProjectListResponse, UpdateProjectRequest};
use kindling_core::Project;

use crate::error::ApiErr;
use crate::lineage;
use crate::routes::auth::AuthUser;
use crate::storage::Db;

/// GET /api/projects — active projects, newest first.
pub async fn list_projects(
    State(db): State<Db>,
    user: AuthUser,
) -> Result<Json<ProjectListResponse>, ApiErr> {
    let conn = db.conn();
    let projects = lineage::list_active_projects(&conn, &user.user_id)?;
    Ok(Json(ProjectListResponse { projects }))
}

/// GET /api/projects/{id}
pub async fn get_project(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiErr> {
    let conn = db.conn();
    let project = lineage::get_project(&conn, &user.user_id, &id)?;
    Ok(Json(project))
}

/// PUT /api/projects/{id} — partial update, including the linked GitHub repo.
pub async fn update_project(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<Project>, ApiErr> {
    let conn = db.conn();
    let project = lineage::update_project(&conn, &user.user_id, &id, &req)?;
    Ok(Json(project))
}

/// POST /api/projects/{id}/archive — idempotent.
pub async fn archive_project(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiErr> {
    let conn = db.conn();
    lineage::archive_project(&conn, &user.user_id, &id)?;
    Ok(Json(OkResponse::ok()))
}

/// DELETE /api/projects/{id} — permanent removal; statuses and tasks go with it.
pub async fn delete_project(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiErr> {
    let conn = db.conn();
    lineage::delete_project(&conn, &user.user_id, &id)?;
    Ok(Json(OkResponse::ok()))
}
