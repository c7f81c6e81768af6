use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use kindling_api::{CreateSparkRequest, OkResponse, PromoteSparkRequest, SparkListResponse};
use kindling_core::{Idea, Spark};

use crate::error::ApiErr;
use crate::lineage;
use crate::routes::auth::AuthUser;
use crate::storage::Db;

/// POST /api/sparks — capture a new spark.
pub async fn create_spark(
    State(db): State<Db>,
    user: AuthUser,
    Json(req): Json<CreateSparkRequest>,
) -> Result<(StatusCode, Json<Spark>), ApiErr> {
    let conn = db.conn();
    let spark = lineage::create_spark(&conn, &user.user_id, &req.title)?;
    Ok((StatusCode::CREATED, Json(spark)))
}

/// GET /api/sparks — active sparks, newest first.
pub async fn list_sparks(
    State(db): State<Db>,
    user: AuthUser,
) -> Result<Json<SparkListResponse>, ApiErr> {
    let conn = db.conn();
    let sparks = lineage::list_active_sparks(&conn, &user.user_id)?;
    Ok(Json(SparkListResponse { sparks }))
}

/// POST /api/sparks/{id}/archive — hide without deleting. Idempotent.
pub async fn archive_spark(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiErr> {
    let conn = db.conn();
    lineage::archive_spark(&conn, &user.user_id, &id)?;
    Ok(Json(OkResponse::ok()))
}

/// DELETE /api/sparks/{id} — permanent removal.
pub async fn delete_spark(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, ApiErr> {
    let conn = db.conn();
    lineage::delete_spark(&conn, &user.user_id, &id)?;
    Ok(Json(OkResponse::ok()))
}

/// POST /api/sparks/{id}/promote — expand the spark into an idea.
/// The spark is consumed.
pub async fn promote_spark(
    State(db): State<Db>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<PromoteSparkRequest>,
) -> Result<(StatusCode, Json<Idea>), ApiErr> {
    let conn = db.conn();
    let idea = lineage::promote_spark_to_idea(&conn, &user.user_id, &id, &req)?;
    Ok((StatusCode::CREATED, Json(idea)))
}
