//! Idea query builders.

use sea_query::{Asterisk, Expr, Func, Order, Query, SqliteQueryBuilder};

use crate::UpdateIdeaRequest;

use super::tables::Ideas;
use super::Built;

#[allow(clippy::too_many_arguments)]
pub fn insert(
    id: &str,
    user_id: &str,
    spark_origin_id: Option<&str>,
    title: &str,
    description: Option<&str>,
    notes: Option<&str>,
    user_story: Option<&str>,
    tech_stack: Option<&str>,
    now: &str,
) -> Built {
    Query::insert()
        .into_table(Ideas::Table)
        .columns([
            Ideas::Id,
            Ideas::UserId,
            Ideas::SparkOriginId,
            Ideas::Title,
            Ideas::Description,
            Ideas::Notes,
            Ideas::UserStory,
            Ideas::TechStack,
            Ideas::CreatedAt,
            Ideas::UpdatedAt,
        ])
        .values_panic([
            id.into(),
            user_id.into(),
            spark_origin_id.map(|s| s.to_string()).into(),
            title.into(),
            description.map(|s| s.to_string()).into(),
            notes.map(|s| s.to_string()).into(),
            user_story.map(|s| s.to_string()).into(),
            tech_stack.map(|s| s.to_string()).into(),
            now.into(),
            now.into(),
        ])
        .returning_all()
        .build(SqliteQueryBuilder)
}

pub fn get(id: &str, user_id: &str) -> Built {
    Query::select()
        .column(Asterisk)
        .from(Ideas::Table)
        .and_where(Expr::col(Ideas::Id).eq(id))
        .and_where(Expr::col(Ideas::UserId).eq(user_id))
        .build(SqliteQueryBuilder)
}

/// Active ideas for an owner, newest first.
pub fn list_active(user_id: &str) -> Built {
    Query::select()
        .column(Asterisk)
        .from(Ideas::Table)
        .and_where(Expr::col(Ideas::UserId).eq(user_id))
        .and_where(Expr::col(Ideas::ArchivedAt).is_null())
        .order_by(Ideas::CreatedAt, Order::Desc)
        .build(SqliteQueryBuilder)
}

/// Apply only the supplied fields; `updated_at` always refreshes and
/// `archived_at` is never part of an update.
pub fn update(id: &str, user_id: &str, fields: &UpdateIdeaRequest, now: &str) -> Built {
    let mut stmt = Query::update();
    stmt.table(Ideas::Table);
    if let Some(title) = &fields.title {
        stmt.value(Ideas::Title, title.as_str());
    }
    if let Some(description) = &fields.description {
        stmt.value(Ideas::Description, description.as_str());
    }
    if let Some(notes) = &fields.notes {
        stmt.value(Ideas::Notes, notes.as_str());
    }
    if let Some(user_story) = &fields.user_story {
        stmt.value(Ideas::UserStory, user_story.as_str());
    }
    if let Some(tech_stack) = &fields.tech_stack {
        stmt.value(Ideas::TechStack, tech_stack.as_str());
    }
    stmt.value(Ideas::UpdatedAt, now)
        .and_where(Expr::col(Ideas::Id).eq(id))
        .and_where(Expr::col(Ideas::UserId).eq(user_id))
        .returning_all()
        .build(SqliteQueryBuilder)
}

/// Stamp `archived_at` only when still active (idempotent archive).
pub fn archive(id: &str, user_id: &str, now: &str) -> Built {
    Query::update()
        .table(Ideas::Table)
        .value(Ideas::ArchivedAt, now)
        .and_where(Expr::col(Ideas::Id).eq(id))
        .and_where(Expr::col(Ideas::UserId).eq(user_id))
        .and_where(Expr::col(Ideas::ArchivedAt).is_null())
        .build(SqliteQueryBuilder)
}

pub fn exists(id: &str, user_id: &str) -> Built {
    Query::select()
        .expr(Expr::expr(Func::count(Expr::col(Asterisk))).gt(0))
        .from(Ideas::Table)
        .and_where(Expr::col(Ideas::Id).eq(id))
        .and_where(Expr::col(Ideas::UserId).eq(user_id))
        .build(SqliteQueryBuilder)
}

/// Hard delete. Projects referencing this idea keep their row; the FK rule
/// clears `idea_origin_id`.
pub fn delete(id: &str, user_id: &str) -> Built {
    Query::delete()
        .from_table(Ideas::Table)
        .and_where(Expr::col(Ideas::Id).eq(id))
        .and_where(Expr::col(Ideas::UserId).eq(user_id))
        .returning(Query::returning().column(Ideas::Id))
        .build(SqliteQueryBuilder)
}
