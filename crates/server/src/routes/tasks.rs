use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use kindling_api::{CreateTaskRequest, OkResponse, TaskListResponse, UpdateTaskRequest};
use kindling_core::Task;

use crate::error::ApiErr;
use crate::lineage;
use crate::routes::auth::AuthUser;
use crate::storage::Db;

/// POST /api/projects/{id}/tasks
pub async fn create_task(
    State(db): State<Db>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiErr> {
    let conn = db.conn();
    let task = lineage::create_task(&conn, &user.user_id, &project_id, &req)?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/projects/{id}/tasks — sort_order, then age.
pub async fn list_tasks(
    State(db): State<Db>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> Result<Json<TaskListResponse>, ApiErr> {
    let conn = db.conn();
    let tasks = lineage::list_tasks(&conn, &user.user_id, &project_id)?;
    Ok(Json(TaskListResponse { tasks }))
}

/// PUT /api/tasks/{id} — partial update. A JSON `"status_id": null` moves the
/// task out of its column; omitting the field leaves the column unchanged.
pub async fn update_task(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiErr> {
    let conn = db.conn();
    let task = lineage::update_task(&conn, &user.user_id, &id, &req)?;
    Ok(Json(task))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiErr> {
    let conn = db.conn();
    lineage::delete_task(&conn, &user.user_id, &id)?;
    Ok(Json(OkResponse::ok()))
}
