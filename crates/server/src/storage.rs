//! Shared SQLite handle, migrations, sea-query execution helpers, and
//! row mappers.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

use kindling_api::db::migrations::MIGRATIONS;
use kindling_core::{Idea, Project, ProjectStatus, Spark, Task, User};

/// Shared database state.
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    pub fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }
}

/// Initialize the database: open connection, enable WAL and foreign keys,
/// run migrations.
pub fn init_db(data_dir: &Path) -> Result<Db> {
    std::fs::create_dir_all(data_dir)?;
    let db_path = data_dir.join("kindling.db");
    let conn = Connection::open(&db_path).context("opening SQLite database")?;

    // WAL for concurrent reads; foreign_keys drives the cascade/set-null rules.
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;

    run_migrations(&conn)?;

    Ok(Db {
        conn: Arc::new(Mutex::new(conn)),
    })
}

/// In-memory database with the full schema, for tests.
#[cfg(test)]
pub fn init_test_db() -> Db {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    conn.execute_batch("PRAGMA foreign_keys=ON;")
        .expect("enable foreign keys");
    run_migrations(&conn).expect("run migrations");
    Db {
        conn: Arc::new(Mutex::new(conn)),
    }
}

fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    for (name, sql) in MIGRATIONS {
        let already_applied: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .unwrap_or(false);

        if !already_applied {
            conn.execute_batch(sql)
                .with_context(|| format!("running migration {name}"))?;
            conn.execute("INSERT INTO _migrations (name) VALUES (?1)", [name])?;
            tracing::info!("Applied migration: {name}");
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// sea-query execution helpers
// ---------------------------------------------------------------------------

fn bind_values(values: &sea_query::Values) -> Vec<Box<dyn rusqlite::ToSql>> {
    values
        .0
        .iter()
        .map(|v| -> Box<dyn rusqlite::ToSql> {
            match v {
                sea_query::Value::String(Some(s)) => Box::new(s.as_str().to_owned()),
                sea_query::Value::Int(Some(i)) => Box::new(*i),
                sea_query::Value::BigInt(Some(i)) => Box::new(*i),
                sea_query::Value::Bool(Some(b)) => Box::new(*b),
                _ => Box::new(rusqlite::types::Null),
            }
        })
        .collect()
}

/// Execute a built statement, returning the affected row count.
pub fn sq_execute(conn: &Connection, (sql, values): (String, sea_query::Values)) -> rusqlite::Result<usize> {
    let params = bind_values(&values);
    let refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    conn.execute(&sql, refs.as_slice())
}

/// Run a built statement that yields exactly one row (selects and
/// `RETURNING` writes alike).
pub fn sq_query_row<T>(
    conn: &Connection,
    (sql, values): (String, sea_query::Values),
    f: impl FnOnce(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
) -> rusqlite::Result<T> {
    let params = bind_values(&values);
    let refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    conn.query_row(&sql, refs.as_slice(), f)
}

/// Run a built select, collecting all mapped rows.
pub fn sq_query_map<T>(
    conn: &Connection,
    (sql, values): (String, sea_query::Values),
    f: impl FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
) -> rusqlite::Result<Vec<T>> {
    let params = bind_values(&values);
    let refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(refs.as_slice(), f)?;
    rows.collect()
}

// ---------------------------------------------------------------------------
// Row mappers (column order = schema order; selects use `*`)
// ---------------------------------------------------------------------------

pub fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        github_id: row.get(1)?,
        username: row.get(2)?,
        email: row.get(3)?,
        avatar_url: row.get(4)?,
        api_key: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub fn spark_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Spark> {
    Ok(Spark {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
        archived_at: row.get(5)?,
    })
}

pub fn idea_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Idea> {
    Ok(Idea {
        id: row.get(0)?,
        user_id: row.get(1)?,
        spark_origin_id: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        notes: row.get(5)?,
        user_story: row.get(6)?,
        tech_stack: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
        archived_at: row.get(10)?,
    })
}

pub fn project_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        user_id: row.get(1)?,
        idea_origin_id: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        user_story: row.get(5)?,
        tech_stack: row.get(6)?,
        github_repo_url: row.get(7)?,
        github_repo_name: row.get(8)?,
        github_repo_owner: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
        archived_at: row.get(12)?,
    })
}

pub fn status_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProjectStatus> {
    Ok(ProjectStatus {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        color: row.get(3)?,
        sort_order: row.get(4)?,
    })
}

pub fn task_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        project_id: row.get(1)?,
        status_id: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        branch_name: row.get(5)?,
        sort_order: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_db_applies_migrations_once() {
        let dir = tempfile::tempdir().expect("tempdir");

        {
            let db = init_db(dir.path()).unwrap();
            let conn = db.conn();
            let applied: usize = conn
                .query_row("SELECT COUNT(*) FROM _migrations", [], |r| r.get(0))
                .unwrap();
            assert_eq!(applied, MIGRATIONS.len());
        }
        assert!(dir.path().join("kindling.db").exists());

        // Reopening the same file must not re-run anything.
        let db = init_db(dir.path()).unwrap();
        let conn = db.conn();
        let applied: usize = conn
            .query_row("SELECT COUNT(*) FROM _migrations", [], |r| r.get(0))
            .unwrap();
        assert_eq!(applied, MIGRATIONS.len());
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let db = init_test_db();
        let conn = db.conn();
        let result = conn.execute(
            "INSERT INTO sparks (id, user_id, title, created_at, updated_at)
             VALUES ('s1', 'no-such-user', 'orphan', datetime('now'), datetime('now'))",
            [],
        );
        assert!(result.is_err());
    }
}
