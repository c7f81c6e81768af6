use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use kindling_api::{CreateStatusRequest, OkResponse, StatusListResponse, UpdateStatusRequest};
use kindling_core::ProjectStatus;

use crate::error::ApiErr;
use crate::lineage;
use crate::routes::auth::AuthUser;
use crate::storage::Db;

/// POST /api/projects/{id}/statuses — add a workflow column.
pub async fn create_status(
    State(db): State<Db>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Json(req): Json<CreateStatusRequest>,
) -> Result<(StatusCode, Json<ProjectStatus>), ApiErr> {
    let conn = db.conn();
    let status = lineage::create_status(&conn, &user.user_id, &project_id, &req)?;
    Ok((StatusCode::CREATED, Json(status)))
}

/// GET /api/projects/{id}/statuses — workflow order (sort_order ascending).
pub async fn list_statuses(
    State(db): State<Db>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> Result<Json<StatusListResponse>, ApiErr> {
    let conn = db.conn();
    let statuses = lineage::list_statuses(&conn, &user.user_id, &project_id)?;
    Ok(Json(StatusListResponse { statuses }))
}

/// PUT /api/statuses/{id}
pub async fn update_status(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<ProjectStatus>, ApiErr> {
    let conn = db.conn();
    let status = lineage::update_status(&conn, &user.user_id, &id, &req)?;
    Ok(Json(status))
}

/// DELETE /api/statuses/{id} — tasks in the column survive with no status.
pub async fn delete_status(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiErr> {
    let conn = db.conn();
    lineage::delete_status(&conn, &user.user_id, &id)?;
    Ok(Json(OkResponse::ok()))
}
