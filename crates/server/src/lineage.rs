//! The lineage manager: promotion and archival rules for the
//! Spark → Idea → Project chain and its dependent statuses and tasks.
//!
//! Every operation takes the calling user's id explicitly — there is no
//! ambient request identity — and runs against a plain [`Connection`], so
//! the whole module is testable without the HTTP layer.
//!
//! Promotions span two writes (create-then-delete, create-then-archive)
//! and are not wrapped in a transaction. A failure between the writes
//! leaves both source and destination in place; that state is surfaced as
//! [`LineageError::PartialPromotion`] so the caller can reconcile manually
//! (delete the orphaned destination or retry the second step).

use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

use kindling_api::db as dbq;
use kindling_api::oauth::GitHubProfile;
use kindling_api::service;
use kindling_api::{
    CreateStatusRequest, CreateTaskRequest, PromoteIdeaRequest, PromoteSparkRequest,
    UpdateIdeaRequest, UpdateProjectRequest, UpdateStatusRequest, UpdateTaskRequest,
};
use kindling_core::validate::{validate_status_name, validate_title, ValidationError};
use kindling_core::{Idea, Project, ProjectStatus, Spark, Task, User, DEFAULT_STATUS_COLOR};

use crate::storage::{
    idea_from_row, project_from_row, spark_from_row, sq_execute, sq_query_map, sq_query_row,
    status_from_row, task_from_row, user_from_row,
};

#[derive(Debug, Error)]
pub enum LineageError {
    /// Empty or missing required field; rejected before any write.
    #[error("{0}")]
    Validation(String),
    /// The entity does not exist or does not belong to the caller.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// Uniqueness or foreign-key violation reported by the store.
    #[error("{0}")]
    Constraint(String),
    /// The second step of a two-step promotion failed after the first
    /// succeeded. Not rolled back automatically.
    #[error("promotion created {kind} {orphan_id} but finalizing the source failed: {reason}")]
    PartialPromotion {
        kind: &'static str,
        orphan_id: String,
        reason: String,
    },
    #[error(transparent)]
    Db(rusqlite::Error),
}

impl From<ValidationError> for LineageError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e.0)
    }
}

fn classify(e: rusqlite::Error) -> LineageError {
    if let rusqlite::Error::SqliteFailure(ffi, msg) = &e {
        if ffi.code == rusqlite::ErrorCode::ConstraintViolation {
            return LineageError::Constraint(
                msg.clone()
                    .unwrap_or_else(|| "constraint violation".to_string()),
            );
        }
    }
    LineageError::Db(e)
}

/// Map "no row" to a typed NotFound, everything else through [`classify`].
fn one<T>(res: rusqlite::Result<T>, kind: &'static str) -> Result<T, LineageError> {
    match res {
        Ok(v) => Ok(v),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(LineageError::NotFound(kind)),
        Err(e) => Err(classify(e)),
    }
}

/// Idempotent archive: the UPDATE only matches active rows. Zero rows
/// affected means either "already archived" (success, timestamp retained)
/// or "no such entity" (NotFound) — the exists probe tells them apart.
fn archive_row(
    conn: &Connection,
    archive: dbq::Built,
    exists: dbq::Built,
    kind: &'static str,
) -> Result<(), LineageError> {
    let affected = sq_execute(conn, archive).map_err(classify)?;
    if affected > 0 {
        return Ok(());
    }
    let found: bool = sq_query_row(conn, exists, |row| row.get(0)).map_err(classify)?;
    if found {
        Ok(())
    } else {
        Err(LineageError::NotFound(kind))
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Insert-if-absent / update-if-present, keyed on the GitHub identity.
/// Returning logins refresh username, email, and avatar.
pub fn upsert_user(conn: &Connection, profile: &GitHubProfile) -> Result<User, LineageError> {
    let github_id = profile.external_id();
    let existing = sq_query_row(conn, dbq::users::get_by_github_id(&github_id), user_from_row);

    match existing {
        Ok(_) => one(
            sq_query_row(
                conn,
                dbq::users::update_profile(
                    &github_id,
                    &profile.login,
                    profile.email.as_deref(),
                    profile.avatar_url.as_deref(),
                    &service::now_utc(),
                ),
                user_from_row,
            ),
            "user",
        ),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            let id = Uuid::new_v4().to_string();
            let api_key = service::generate_api_key();
            one(
                sq_query_row(
                    conn,
                    dbq::users::insert(
                        &id,
                        &github_id,
                        &profile.login,
                        profile.email.as_deref(),
                        profile.avatar_url.as_deref(),
                        &api_key,
                        &service::now_utc(),
                    ),
                    user_from_row,
                ),
                "user",
            )
        }
        Err(e) => Err(classify(e)),
    }
}

/// Hard-delete the user and, through the FK rules, everything they own.
pub fn delete_user(conn: &Connection, user_id: &str) -> Result<(), LineageError> {
    one(
        sq_query_row(conn, dbq::users::delete(user_id), |row| {
            row.get::<_, String>(0)
        }),
        "user",
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Sparks
// ---------------------------------------------------------------------------

pub fn create_spark(conn: &Connection, user_id: &str, title: &str) -> Result<Spark, LineageError> {
    let title = validate_title(title)?;
    let id = Uuid::new_v4().to_string();
    let now = service::now_utc();
    one(
        sq_query_row(
            conn,
            dbq::sparks::insert(&id, user_id, &title, &now),
            spark_from_row,
        ),
        "spark",
    )
}

pub fn get_spark(conn: &Connection, user_id: &str, id: &str) -> Result<Spark, LineageError> {
    one(
        sq_query_row(conn, dbq::sparks::get(id, user_id), spark_from_row),
        "spark",
    )
}

pub fn list_active_sparks(conn: &Connection, user_id: &str) -> Result<Vec<Spark>, LineageError> {
    sq_query_map(conn, dbq::sparks::list_active(user_id), spark_from_row).map_err(classify)
}

pub fn archive_spark(conn: &Connection, user_id: &str, id: &str) -> Result<(), LineageError> {
    archive_row(
        conn,
        dbq::sparks::archive(id, user_id, &service::now_utc()),
        dbq::sparks::exists(id, user_id),
        "spark",
    )
}

pub fn delete_spark(conn: &Connection, user_id: &str, id: &str) -> Result<(), LineageError> {
    one(
        sq_query_row(conn, dbq::sparks::delete(id, user_id), |row| {
            row.get::<_, String>(0)
        }),
        "spark",
    )?;
    Ok(())
}

/// Promote a spark into an idea. The spark's title is copied onto the new
/// idea, then the spark is hard-deleted — consumed, not archived. The
/// returned idea is the pre-deletion snapshot and carries the origin
/// reference; the stored row's `spark_origin_id` is cleared by the FK rule
/// the moment the source spark is deleted.
pub fn promote_spark_to_idea(
    conn: &Connection,
    user_id: &str,
    spark_id: &str,
    extra: &PromoteSparkRequest,
) -> Result<Idea, LineageError> {
    let spark = get_spark(conn, user_id, spark_id)?;
    let title = validate_title(&spark.title)?;

    let idea_id = Uuid::new_v4().to_string();
    let now = service::now_utc();
    let idea = one(
        sq_query_row(
            conn,
            dbq::ideas::insert(
                &idea_id,
                user_id,
                Some(&spark.id),
                &title,
                extra.description.as_deref(),
                extra.notes.as_deref(),
                None,
                None,
                &now,
            ),
            idea_from_row,
        ),
        "idea",
    )?;

    if let Err(e) = sq_query_row(conn, dbq::sparks::delete(spark_id, user_id), |row| {
        row.get::<_, String>(0)
    }) {
        return Err(LineageError::PartialPromotion {
            kind: "idea",
            orphan_id: idea.id,
            reason: e.to_string(),
        });
    }

    Ok(idea)
}

// ---------------------------------------------------------------------------
// Ideas
// ---------------------------------------------------------------------------

pub fn get_idea(conn: &Connection, user_id: &str, id: &str) -> Result<Idea, LineageError> {
    one(
        sq_query_row(conn, dbq::ideas::get(id, user_id), idea_from_row),
        "idea",
    )
}

pub fn list_active_ideas(conn: &Connection, user_id: &str) -> Result<Vec<Idea>, LineageError> {
    sq_query_map(conn, dbq::ideas::list_active(user_id), idea_from_row).map_err(classify)
}

pub fn update_idea(
    conn: &Connection,
    user_id: &str,
    id: &str,
    fields: &UpdateIdeaRequest,
) -> Result<Idea, LineageError> {
    let mut fields = fields.clone();
    if let Some(title) = &fields.title {
        fields.title = Some(validate_title(title)?);
    }
    one(
        sq_query_row(
            conn,
            dbq::ideas::update(id, user_id, &fields, &service::now_utc()),
            idea_from_row,
        ),
        "idea",
    )
}

pub fn archive_idea(conn: &Connection, user_id: &str, id: &str) -> Result<(), LineageError> {
    archive_row(
        conn,
        dbq::ideas::archive(id, user_id, &service::now_utc()),
        dbq::ideas::exists(id, user_id),
        "idea",
    )
}

pub fn delete_idea(conn: &Connection, user_id: &str, id: &str) -> Result<(), LineageError> {
    one(
        sq_query_row(conn, dbq::ideas::delete(id, user_id), |row| {
            row.get::<_, String>(0)
        }),
        "idea",
    )?;
    Ok(())
}

/// Promote an idea into a project. Pending field edits are persisted first
/// so the project snapshot matches the latest idea state; the idea is then
/// archived — not deleted — which preserves the lineage chain. An archived
/// idea may be promoted again; archived is not a terminal state here.
pub fn promote_idea_to_project(
    conn: &Connection,
    user_id: &str,
    idea_id: &str,
    req: &PromoteIdeaRequest,
) -> Result<Project, LineageError> {
    let mut idea = get_idea(conn, user_id, idea_id)?;
    if let Some(edits) = req.pending_edits() {
        idea = update_idea(conn, user_id, idea_id, &edits)?;
    }
    let title = validate_title(&idea.title)?;

    let project_id = Uuid::new_v4().to_string();
    let now = service::now_utc();
    let project = one(
        sq_query_row(
            conn,
            dbq::projects::insert(
                &project_id,
                user_id,
                Some(&idea.id),
                &title,
                idea.description.as_deref(),
                idea.user_story.as_deref(),
                idea.tech_stack.as_deref(),
                &now,
            ),
            project_from_row,
        ),
        "project",
    )?;

    if let Err(e) = archive_idea(conn, user_id, idea_id) {
        return Err(LineageError::PartialPromotion {
            kind: "project",
            orphan_id: project.id,
            reason: e.to_string(),
        });
    }

    Ok(project)
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

pub fn get_project(conn: &Connection, user_id: &str, id: &str) -> Result<Project, LineageError> {
    one(
        sq_query_row(conn, dbq::projects::get(id, user_id), project_from_row),
        "project",
    )
}

pub fn list_active_projects(
    conn: &Connection,
    user_id: &str,
) -> Result<Vec<Project>, LineageError> {
    sq_query_map(conn, dbq::projects::list_active(user_id), project_from_row).map_err(classify)
}

pub fn update_project(
    conn: &Connection,
    user_id: &str,
    id: &str,
    fields: &UpdateProjectRequest,
) -> Result<Project, LineageError> {
    let mut fields = fields.clone();
    if let Some(title) = &fields.title {
        fields.title = Some(validate_title(title)?);
    }
    one(
        sq_query_row(
            conn,
            dbq::projects::update(id, user_id, &fields, &service::now_utc()),
            project_from_row,
        ),
        "project",
    )
}

pub fn archive_project(conn: &Connection, user_id: &str, id: &str) -> Result<(), LineageError> {
    archive_row(
        conn,
        dbq::projects::archive(id, user_id, &service::now_utc()),
        dbq::projects::exists(id, user_id),
        "project",
    )
}

pub fn delete_project(conn: &Connection, user_id: &str, id: &str) -> Result<(), LineageError> {
    one(
        sq_query_row(conn, dbq::projects::delete(id, user_id), |row| {
            row.get::<_, String>(0)
        }),
        "project",
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Project statuses
// ---------------------------------------------------------------------------

pub fn create_status(
    conn: &Connection,
    user_id: &str,
    project_id: &str,
    req: &CreateStatusRequest,
) -> Result<ProjectStatus, LineageError> {
    get_project(conn, user_id, project_id)?;
    let name = validate_status_name(&req.name)?;
    let color = req.color.as_deref().unwrap_or(DEFAULT_STATUS_COLOR);
    let id = Uuid::new_v4().to_string();
    one(
        sq_query_row(
            conn,
            dbq::statuses::insert(&id, project_id, &name, color, req.sort_order),
            status_from_row,
        ),
        "status",
    )
}

pub fn list_statuses(
    conn: &Connection,
    user_id: &str,
    project_id: &str,
) -> Result<Vec<ProjectStatus>, LineageError> {
    get_project(conn, user_id, project_id)?;
    sq_query_map(conn, dbq::statuses::list(project_id), status_from_row).map_err(classify)
}

pub fn update_status(
    conn: &Connection,
    user_id: &str,
    id: &str,
    fields: &UpdateStatusRequest,
) -> Result<ProjectStatus, LineageError> {
    // No timestamp column to refresh, so an all-absent body would build an
    // UPDATE with an empty SET list. Return the current row instead.
    if fields.is_empty() {
        return one(
            sq_query_row(conn, dbq::statuses::get(id, user_id), status_from_row),
            "status",
        );
    }
    let mut fields = fields.clone();
    if let Some(name) = &fields.name {
        fields.name = Some(validate_status_name(name)?);
    }
    one(
        sq_query_row(
            conn,
            dbq::statuses::update(id, user_id, &fields),
            status_from_row,
        ),
        "status",
    )
}

/// Delete a workflow status. Tasks pointing at it keep their rows with
/// `status_id` cleared.
pub fn delete_status(conn: &Connection, user_id: &str, id: &str) -> Result<(), LineageError> {
    one(
        sq_query_row(conn, dbq::statuses::delete(id, user_id), |row| {
            row.get::<_, String>(0)
        }),
        "status",
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

pub fn create_task(
    conn: &Connection,
    user_id: &str,
    project_id: &str,
    req: &CreateTaskRequest,
) -> Result<Task, LineageError> {
    get_project(conn, user_id, project_id)?;
    let title = validate_title(&req.title)?;
    let id = Uuid::new_v4().to_string();
    let now = service::now_utc();
    one(
        sq_query_row(
            conn,
            dbq::tasks::insert(
                &id,
                project_id,
                req.status_id.as_deref(),
                &title,
                req.description.as_deref(),
                req.branch_name.as_deref(),
                req.sort_order.unwrap_or(0),
                &now,
            ),
            task_from_row,
        ),
        "task",
    )
}

pub fn list_tasks(
    conn: &Connection,
    user_id: &str,
    project_id: &str,
) -> Result<Vec<Task>, LineageError> {
    get_project(conn, user_id, project_id)?;
    sq_query_map(conn, dbq::tasks::list(project_id), task_from_row).map_err(classify)
}

pub fn update_task(
    conn: &Connection,
    user_id: &str,
    id: &str,
    fields: &UpdateTaskRequest,
) -> Result<Task, LineageError> {
    let mut fields = fields.clone();
    if let Some(title) = &fields.title {
        fields.title = Some(validate_title(title)?);
    }
    one(
        sq_query_row(
            conn,
            dbq::tasks::update(id, user_id, &fields, &service::now_utc()),
            task_from_row,
        ),
        "task",
    )
}

pub fn delete_task(conn: &Connection, user_id: &str, id: &str) -> Result<(), LineageError> {
    one(
        sq_query_row(conn, dbq::tasks::delete(id, user_id), |row| {
            row.get::<_, String>(0)
        }),
        "task",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{init_test_db, Db};

    fn gh(id: i64, login: &str) -> GitHubProfile {
        GitHubProfile {
            id,
            login: login.to_string(),
            email: Some(format!("{login}@example.com")),
            avatar_url: Some(format!("https://avatars.example/{login}")),
        }
    }

    fn setup() -> (Db, User) {
        let db = init_test_db();
        let user = {
            let conn = db.conn();
            upsert_user(&conn, &gh(1, "alice")).expect("seed user")
        };
        (db, user)
    }

    fn backdate(conn: &Connection, table: &str, id: &str, when: &str) {
        conn.execute(
            &format!("UPDATE {table} SET created_at = ?1, updated_at = ?1 WHERE id = ?2"),
            rusqlite::params![when, id],
        )
        .expect("backdate row");
    }

    // ── Users ───────────────────────────────────────────────────────────────

    #[test]
    fn upsert_user_is_keyed_on_github_id() {
        let (db, user) = setup();
        let conn = db.conn();

        let again = upsert_user(&conn, &gh(1, "alice-renamed")).unwrap();
        assert_eq!(again.id, user.id);
        assert_eq!(again.username, "alice-renamed");
        assert_eq!(again.api_key, user.api_key);

        let other = upsert_user(&conn, &gh(2, "bob")).unwrap();
        assert_ne!(other.id, user.id);
    }

    #[test]
    fn delete_user_cascades_through_the_whole_tree() {
        let (db, user) = setup();
        let conn = db.conn();

        let spark = create_spark(&conn, &user.id, "keep me honest").unwrap();
        let idea =
            promote_spark_to_idea(&conn, &user.id, &spark.id, &PromoteSparkRequest::default())
                .unwrap();
        let project =
            promote_idea_to_project(&conn, &user.id, &idea.id, &PromoteIdeaRequest::default())
                .unwrap();
        let status = create_status(
            &conn,
            &user.id,
            &project.id,
            &CreateStatusRequest {
                name: "Doing".into(),
                color: None,
                sort_order: 1,
            },
        )
        .unwrap();
        create_task(
            &conn,
            &user.id,
            &project.id,
            &CreateTaskRequest {
                title: "first task".into(),
                description: None,
                status_id: Some(status.id.clone()),
                branch_name: None,
                sort_order: None,
            },
        )
        .unwrap();

        delete_user(&conn, &user.id).unwrap();

        for table in ["sparks", "ideas", "projects", "project_statuses", "tasks"] {
            let count: i64 = conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
                .unwrap();
            assert_eq!(count, 0, "{table} not emptied by user cascade");
        }
    }

    // ── Sparks ──────────────────────────────────────────────────────────────

    #[test]
    fn create_spark_is_active_with_equal_timestamps() {
        let (db, user) = setup();
        let conn = db.conn();

        let spark = create_spark(&conn, &user.id, "  Build a CLI tool  ").unwrap();
        assert_eq!(spark.title, "Build a CLI tool");
        assert!(spark.is_active());
        assert_eq!(spark.created_at, spark.updated_at);
    }

    #[test]
    fn blank_title_is_rejected_before_any_write() {
        let (db, user) = setup();
        let conn = db.conn();

        let err = create_spark(&conn, &user.id, "   ").unwrap_err();
        assert!(matches!(err, LineageError::Validation(_)));

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM sparks", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn spark_promotion_consumes_the_spark() {
        let (db, user) = setup();
        let conn = db.conn();

        let spark = create_spark(&conn, &user.id, "Build a CLI tool").unwrap();
        let idea = promote_spark_to_idea(
            &conn,
            &user.id,
            &spark.id,
            &PromoteSparkRequest {
                description: Some("D".into()),
                notes: Some("N".into()),
            },
        )
        .unwrap();

        assert_eq!(idea.title, "Build a CLI tool");
        assert_eq!(idea.spark_origin_id.as_deref(), Some(spark.id.as_str()));
        assert_eq!(idea.description.as_deref(), Some("D"));
        assert_eq!(idea.notes.as_deref(), Some("N"));

        // The spark is gone.
        assert!(matches!(
            get_spark(&conn, &user.id, &spark.id),
            Err(LineageError::NotFound("spark"))
        ));

        // Deleting the consumed spark cleared the stored back-reference
        // (set-null rule); the idea row itself survives.
        let stored = get_idea(&conn, &user.id, &idea.id).unwrap();
        assert_eq!(stored.spark_origin_id, None);
    }

    #[test]
    fn deleting_a_spark_clears_idea_origin_but_keeps_the_idea() {
        let (db, user) = setup();
        let conn = db.conn();

        // Reference a live spark from an idea row, then delete the spark.
        let spark = create_spark(&conn, &user.id, "origin").unwrap();
        let idea = one(
            sq_query_row(
                &conn,
                dbq::ideas::insert(
                    "idea-1",
                    &user.id,
                    Some(&spark.id),
                    "expanded",
                    None,
                    None,
                    None,
                    None,
                    &service::now_utc(),
                ),
                idea_from_row,
            ),
            "idea",
        )
        .unwrap();
        assert_eq!(idea.spark_origin_id.as_deref(), Some(spark.id.as_str()));

        delete_spark(&conn, &user.id, &spark.id).unwrap();

        let survivor = get_idea(&conn, &user.id, &idea.id).unwrap();
        assert_eq!(survivor.spark_origin_id, None);
        assert!(survivor.is_active());
    }

    // ── Ideas ───────────────────────────────────────────────────────────────

    #[test]
    fn idea_promotion_archives_and_preserves_lineage() {
        let (db, user) = setup();
        let conn = db.conn();

        let spark = create_spark(&conn, &user.id, "Build a CLI tool").unwrap();
        let idea =
            promote_spark_to_idea(&conn, &user.id, &spark.id, &PromoteSparkRequest::default())
                .unwrap();
        let project =
            promote_idea_to_project(&conn, &user.id, &idea.id, &PromoteIdeaRequest::default())
                .unwrap();

        assert_eq!(project.idea_origin_id.as_deref(), Some(idea.id.as_str()));

        // The idea is archived, not deleted.
        let archived = get_idea(&conn, &user.id, &idea.id).unwrap();
        assert!(archived.archived_at.is_some());
    }

    #[test]
    fn pending_edits_are_persisted_before_the_snapshot() {
        let (db, user) = setup();
        let conn = db.conn();

        let spark = create_spark(&conn, &user.id, "Build a CLI tool").unwrap();
        let idea =
            promote_spark_to_idea(&conn, &user.id, &spark.id, &PromoteSparkRequest::default())
                .unwrap();

        let project = promote_idea_to_project(
            &conn,
            &user.id,
            &idea.id,
            &PromoteIdeaRequest {
                tech_stack: Some("Go".into()),
                description: Some("D".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(project.tech_stack.as_deref(), Some("Go"));
        assert_eq!(project.description.as_deref(), Some("D"));

        // The edits landed on the idea too, not just the project.
        let stored = get_idea(&conn, &user.id, &idea.id).unwrap();
        assert_eq!(stored.tech_stack.as_deref(), Some("Go"));
    }

    #[test]
    fn re_promoting_an_archived_idea_is_permitted() {
        let (db, user) = setup();
        let conn = db.conn();

        let spark = create_spark(&conn, &user.id, "twice promoted").unwrap();
        let idea =
            promote_spark_to_idea(&conn, &user.id, &spark.id, &PromoteSparkRequest::default())
                .unwrap();

        let first =
            promote_idea_to_project(&conn, &user.id, &idea.id, &PromoteIdeaRequest::default())
                .unwrap();
        let second =
            promote_idea_to_project(&conn, &user.id, &idea.id, &PromoteIdeaRequest::default())
                .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.idea_origin_id, second.idea_origin_id);
    }

    #[test]
    fn update_applies_only_supplied_fields_and_bumps_updated_at() {
        let (db, user) = setup();
        let conn = db.conn();

        let spark = create_spark(&conn, &user.id, "base").unwrap();
        let idea = promote_spark_to_idea(
            &conn,
            &user.id,
            &spark.id,
            &PromoteSparkRequest {
                description: Some("keep".into()),
                notes: None,
            },
        )
        .unwrap();
        backdate(&conn, "ideas", &idea.id, "2020-01-01 00:00:00");

        let updated = update_idea(
            &conn,
            &user.id,
            &idea.id,
            &UpdateIdeaRequest {
                notes: Some("added".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(updated.description.as_deref(), Some("keep"));
        assert_eq!(updated.notes.as_deref(), Some("added"));
        assert_ne!(updated.updated_at, "2020-01-01 00:00:00");
        assert_eq!(updated.created_at, "2020-01-01 00:00:00");
        assert_eq!(updated.archived_at, None);
    }

    #[test]
    fn update_never_touches_archived_at() {
        let (db, user) = setup();
        let conn = db.conn();

        let spark = create_spark(&conn, &user.id, "to archive").unwrap();
        let idea =
            promote_spark_to_idea(&conn, &user.id, &spark.id, &PromoteSparkRequest::default())
                .unwrap();
        archive_idea(&conn, &user.id, &idea.id).unwrap();
        let stamped = get_idea(&conn, &user.id, &idea.id).unwrap().archived_at;

        update_idea(
            &conn,
            &user.id,
            &idea.id,
            &UpdateIdeaRequest {
                title: Some("still editable".into()),
                ..Default::default()
            },
        )
        .unwrap();

        let after = get_idea(&conn, &user.id, &idea.id).unwrap();
        assert_eq!(after.archived_at, stamped);
        assert_eq!(after.title, "still editable");
    }

    #[test]
    fn archive_is_idempotent_and_keeps_the_first_timestamp() {
        let (db, user) = setup();
        let conn = db.conn();

        let spark = create_spark(&conn, &user.id, "archive me").unwrap();
        archive_spark(&conn, &user.id, &spark.id).unwrap();

        conn.execute(
            "UPDATE sparks SET archived_at = '2021-05-05 05:05:05' WHERE id = ?1",
            [&spark.id],
        )
        .unwrap();

        archive_spark(&conn, &user.id, &spark.id).unwrap();

        let stamped: String = conn
            .query_row(
                "SELECT archived_at FROM sparks WHERE id = ?1",
                [&spark.id],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(stamped, "2021-05-05 05:05:05");
    }

    #[test]
    fn archive_of_missing_entity_is_not_found() {
        let (db, user) = setup();
        let conn = db.conn();
        assert!(matches!(
            archive_idea(&conn, &user.id, "nope"),
            Err(LineageError::NotFound("idea"))
        ));
    }

    // ── Listing ─────────────────────────────────────────────────────────────

    #[test]
    fn active_listing_excludes_archived_and_orders_newest_first() {
        let (db, user) = setup();
        let conn = db.conn();

        let oldest = create_spark(&conn, &user.id, "oldest").unwrap();
        backdate(&conn, "sparks", &oldest.id, "2024-01-01 00:00:00");
        let middle = create_spark(&conn, &user.id, "middle").unwrap();
        backdate(&conn, "sparks", &middle.id, "2024-06-01 00:00:00");
        let newest = create_spark(&conn, &user.id, "newest").unwrap();
        backdate(&conn, "sparks", &newest.id, "2024-12-01 00:00:00");

        archive_spark(&conn, &user.id, &middle.id).unwrap();

        let listed = list_active_sparks(&conn, &user.id).unwrap();
        let titles: Vec<&str> = listed.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["newest", "oldest"]);
        assert!(listed.iter().all(|s| s.archived_at.is_none()));
    }

    #[test]
    fn listing_is_scoped_to_the_owner() {
        let (db, alice) = setup();
        let conn = db.conn();
        let bob = upsert_user(&conn, &gh(2, "bob")).unwrap();

        create_spark(&conn, &alice.id, "hers").unwrap();
        create_spark(&conn, &bob.id, "his").unwrap();

        let hers = list_active_sparks(&conn, &alice.id).unwrap();
        assert_eq!(hers.len(), 1);
        assert_eq!(hers[0].title, "hers");
    }

    // ── Statuses and tasks ──────────────────────────────────────────────────

    fn seed_project(conn: &Connection, user_id: &str) -> Project {
        let spark = create_spark(conn, user_id, "seed").unwrap();
        let idea =
            promote_spark_to_idea(conn, user_id, &spark.id, &PromoteSparkRequest::default())
                .unwrap();
        promote_idea_to_project(conn, user_id, &idea.id, &PromoteIdeaRequest::default()).unwrap()
    }

    #[test]
    fn status_defaults_to_neutral_gray() {
        let (db, user) = setup();
        let conn = db.conn();
        let project = seed_project(&conn, &user.id);

        let status = create_status(
            &conn,
            &user.id,
            &project.id,
            &CreateStatusRequest {
                name: "Backlog".into(),
                color: None,
                sort_order: 0,
            },
        )
        .unwrap();
        assert_eq!(status.color, DEFAULT_STATUS_COLOR);
    }

    #[test]
    fn statuses_list_in_workflow_order() {
        let (db, user) = setup();
        let conn = db.conn();
        let project = seed_project(&conn, &user.id);

        for (name, order) in [("Done", 2), ("Backlog", 0), ("Doing", 1)] {
            create_status(
                &conn,
                &user.id,
                &project.id,
                &CreateStatusRequest {
                    name: name.into(),
                    color: None,
                    sort_order: order,
                },
            )
            .unwrap();
        }

        let names: Vec<String> = list_statuses(&conn, &user.id, &project.id)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Backlog", "Doing", "Done"]);
    }

    #[test]
    fn empty_status_update_returns_the_row_unchanged() {
        let (db, user) = setup();
        let conn = db.conn();
        let project = seed_project(&conn, &user.id);

        let status = create_status(
            &conn,
            &user.id,
            &project.id,
            &CreateStatusRequest {
                name: "Doing".into(),
                color: Some("#ff0000".into()),
                sort_order: 3,
            },
        )
        .unwrap();

        let unchanged = update_status(&conn, &user.id, &status.id, &UpdateStatusRequest::default())
            .unwrap();
        assert_eq!(unchanged.name, "Doing");
        assert_eq!(unchanged.color, "#ff0000");
        assert_eq!(unchanged.sort_order, 3);

        // Foreign and missing ids still behave identically.
        let carol = upsert_user(&conn, &gh(3, "carol")).unwrap();
        assert!(matches!(
            update_status(&conn, &carol.id, &status.id, &UpdateStatusRequest::default()),
            Err(LineageError::NotFound("status"))
        ));
    }

    #[test]
    fn deleting_a_status_clears_task_references_only() {
        let (db, user) = setup();
        let conn = db.conn();
        let project = seed_project(&conn, &user.id);

        let status = create_status(
            &conn,
            &user.id,
            &project.id,
            &CreateStatusRequest {
                name: "Doing".into(),
                color: None,
                sort_order: 0,
            },
        )
        .unwrap();
        let task = create_task(
            &conn,
            &user.id,
            &project.id,
            &CreateTaskRequest {
                title: "wire it up".into(),
                description: None,
                status_id: Some(status.id.clone()),
                branch_name: Some("feat/wiring".into()),
                sort_order: None,
            },
        )
        .unwrap();
        assert_eq!(task.status_id.as_deref(), Some(status.id.as_str()));

        delete_status(&conn, &user.id, &status.id).unwrap();

        let survivors = list_tasks(&conn, &user.id, &project.id).unwrap();
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].id, task.id);
        assert_eq!(survivors[0].status_id, None);
    }

    #[test]
    fn deleting_a_project_cascades_statuses_and_tasks() {
        let (db, user) = setup();
        let conn = db.conn();
        let project = seed_project(&conn, &user.id);

        let status = create_status(
            &conn,
            &user.id,
            &project.id,
            &CreateStatusRequest {
                name: "Doing".into(),
                color: None,
                sort_order: 0,
            },
        )
        .unwrap();
        create_task(
            &conn,
            &user.id,
            &project.id,
            &CreateTaskRequest {
                title: "doomed".into(),
                description: None,
                status_id: Some(status.id),
                branch_name: None,
                sort_order: None,
            },
        )
        .unwrap();

        delete_project(&conn, &user.id, &project.id).unwrap();

        let statuses: i64 = conn
            .query_row("SELECT COUNT(*) FROM project_statuses", [], |r| r.get(0))
            .unwrap();
        let tasks: i64 = conn
            .query_row("SELECT COUNT(*) FROM tasks", [], |r| r.get(0))
            .unwrap();
        assert_eq!((statuses, tasks), (0, 0));
    }

    #[test]
    fn task_can_be_moved_out_of_any_status() {
        let (db, user) = setup();
        let conn = db.conn();
        let project = seed_project(&conn, &user.id);

        let status = create_status(
            &conn,
            &user.id,
            &project.id,
            &CreateStatusRequest {
                name: "Doing".into(),
                color: None,
                sort_order: 0,
            },
        )
        .unwrap();
        let task = create_task(
            &conn,
            &user.id,
            &project.id,
            &CreateTaskRequest {
                title: "movable".into(),
                description: None,
                status_id: Some(status.id),
                branch_name: None,
                sort_order: None,
            },
        )
        .unwrap();

        let moved = update_task(
            &conn,
            &user.id,
            &task.id,
            &UpdateTaskRequest {
                status_id: Some(None),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(moved.status_id, None);
    }

    #[test]
    fn sub_entity_access_is_owner_scoped() {
        let (db, alice) = setup();
        let conn = db.conn();
        let bob = upsert_user(&conn, &gh(2, "bob")).unwrap();
        let project = seed_project(&conn, &alice.id);
        let status = create_status(
            &conn,
            &alice.id,
            &project.id,
            &CreateStatusRequest {
                name: "Doing".into(),
                color: None,
                sort_order: 0,
            },
        )
        .unwrap();

        assert!(matches!(
            list_statuses(&conn, &bob.id, &project.id),
            Err(LineageError::NotFound("project"))
        ));
        assert!(matches!(
            delete_status(&conn, &bob.id, &status.id),
            Err(LineageError::NotFound("status"))
        ));
    }

    // ── End to end ──────────────────────────────────────────────────────────

    #[test]
    fn spark_to_project_end_to_end() {
        let (db, user) = setup();
        let conn = db.conn();

        let spark = create_spark(&conn, &user.id, "Build a CLI tool").unwrap();
        let idea = promote_spark_to_idea(
            &conn,
            &user.id,
            &spark.id,
            &PromoteSparkRequest {
                description: Some("D".into()),
                notes: None,
            },
        )
        .unwrap();
        let project = promote_idea_to_project(
            &conn,
            &user.id,
            &idea.id,
            &PromoteIdeaRequest {
                tech_stack: Some("Go".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(project.idea_origin_id.as_deref(), Some(idea.id.as_str()));
        assert_eq!(project.title, "Build a CLI tool");
        assert_eq!(project.description.as_deref(), Some("D"));
        assert_eq!(project.tech_stack.as_deref(), Some("Go"));

        let archived = get_idea(&conn, &user.id, &idea.id).unwrap();
        assert!(archived.archived_at.is_some());

        assert!(matches!(
            get_spark(&conn, &user.id, &spark.id),
            Err(LineageError::NotFound("spark"))
        ));
    }
}
