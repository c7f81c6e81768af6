use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

use crate::lineage::LineageError;

/// Unified API error type. Produces `{"error": "<message>"}` JSON responses.
pub struct ApiErr {
    status: StatusCode,
    message: String,
}

impl ApiErr {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }

    /// Build a closure that logs a DB/IO error and returns `500 Internal Server Error`.
    pub fn from_db<E: fmt::Display>(context: &str) -> impl FnOnce(E) -> Self + '_ {
        move |e| {
            tracing::error!("{context}: {e}");
            Self::internal("internal server error")
        }
    }
}

impl From<LineageError> for ApiErr {
    fn from(e: LineageError) -> Self {
        match e {
            LineageError::Validation(msg) => Self::bad_request(msg),
            LineageError::NotFound(kind) => Self::not_found(format!("{kind} not found")),
            LineageError::Constraint(msg) => Self::conflict(msg),
            // Surfaced distinctly: the caller must reconcile by deleting the
            // orphan or retrying the second step (no automatic rollback).
            LineageError::PartialPromotion {
                kind,
                orphan_id,
                reason,
            } => {
                tracing::error!("partial promotion, orphaned {kind} {orphan_id}: {reason}");
                Self::internal(format!(
                    "promotion partially completed: {kind} {orphan_id} was created but the source was not finalized"
                ))
            }
            LineageError::Db(e) => {
                tracing::error!("database error: {e}");
                Self::internal("internal server error")
            }
        }
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({"error": self.message})),
        )
            .into_response()
    }
}
