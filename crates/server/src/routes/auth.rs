use axum::{
    extract::{FromRef, FromRequestParts, State},
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};

use kindling_api::db as dbq;
use kindling_core::User;

use crate::error::ApiErr;
use crate::lineage;
use crate::storage::{sq_query_row, user_from_row, Db};

// ---------------------------------------------------------------------------
// Auth extractor
// ---------------------------------------------------------------------------

/// Authenticated user extracted from the `Authorization: Bearer <api_key>` header.
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Db: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let db = Db::from_ref(state);

        let api_key = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| {
                ApiErr::unauthorized("missing or invalid Authorization header").into_response()
            })?
            .to_string();

        let conn = db.conn();
        let result = sq_query_row(&conn, dbq::users::get_by_api_key(&api_key), user_from_row);

        match result {
            Ok(user) => Ok(AuthUser {
                user_id: user.id,
                username: user.username,
            }),
            Err(_) => Err(ApiErr::unauthorized("invalid API key").into_response()),
        }
    }
}

// ---------------------------------------------------------------------------
// Current user
// ---------------------------------------------------------------------------

/// GET /api/auth/me — profile of the calling user.
pub async fn me(State(db): State<Db>, user: AuthUser) -> Result<Json<User>, ApiErr> {
    let conn = db.conn();
    let profile = sq_query_row(&conn, dbq::users::get_by_id(&user.user_id), user_from_row)
        .map_err(ApiErr::from_db("load current user"))?;
    Ok(Json(profile))
}

/// DELETE /api/auth/me — delete the account and everything it owns.
pub async fn delete_me(
    State(db): State<Db>,
    user: AuthUser,
) -> Result<Json<kindling_api::OkResponse>, ApiErr> {
    let conn = db.conn();
    lineage::delete_user(&conn, &user.user_id)?;
    tracing::info!("deleted account {}", user.username);
    Ok(Json(kindling_api::OkResponse::ok()))
}
