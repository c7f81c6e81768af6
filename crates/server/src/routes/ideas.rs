use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use kindling_api::{IdeaListResponse, OkResponse, PromoteIdeaRequest, UpdateIdeaRequest};
use kindling_core::{Idea, Project};

use crate::error::ApiErr;
use crate::lineage;
use crate::routes::auth::AuthUser;
use crate::storage::Db;

/// GET /api/ideas — active ideas, newest first.
pub async fn list_ideas(
    State(db): State<Db>,
    user: AuthUser,
) -> Result<Json<IdeaListResponse>, ApiErr> {
    let conn = db.conn();
    let ideas = lineage::list_active_ideas(&conn, &user.user_id)?;
    Ok(Json(IdeaListResponse { ideas }))
}

/// GET /api/ideas/{id}
pub async fn get_idea(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Idea>, ApiErr> {
    let conn = db.conn();
    let idea = lineage::get_idea(&conn, &user.user_id, &id)?;
    Ok(Json(idea))
}

/// PUT /api/ideas/{id} — partial update; absent fields are left alone.
pub async fn update_idea(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateIdeaRequest>,
) -> Result<Json<Idea>, ApiErr> {
    let conn = db.conn();
    let idea = lineage::update_idea(&conn, &user.user_id, &id, &req)?;
    Ok(Json(idea))
}

/// POST /api/ideas/{id}/archive — idempotent.
pub async fn archive_idea(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiErr> {
    let conn = db.conn();
    lineage::archive_idea(&conn, &user.user_id, &id)?;
    Ok(Json(OkResponse::ok()))
}

/// DELETE /api/ideas/{id} — permanent removal.
pub async fn delete_idea(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiErr> {
    let conn = db.conn();
    lineage::delete_idea(&conn, &user.user_id, &id)?;
    Ok(Json(OkResponse::ok()))
}

/// POST /api/ideas/{id}/promote — graduate the idea into a project.
/// Pending edits in the body are persisted first; the idea is archived.
pub async fn promote_idea(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<PromoteIdeaRequest>,
) -> Result<(StatusCode, Json<Project>), ApiErr> {
    let conn = db.conn();
    let project = lineage::promote_idea_to_project(&conn, &user.user_id, &id, &req)?;
    Ok((StatusCode::CREATED, Json(project)))
}
