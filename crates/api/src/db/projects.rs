//! Project query builders.

use sea_query::{Asterisk, Expr, Func, Order, Query, SqliteQueryBuilder};

use crate::UpdateProjectRequest;

use super::tables::Projects;
use super::Built;

#[allow(clippy::too_many_arguments)]
pub fn insert(
    id: &str,
    user_id: &str,
    idea_origin_id: Option<&str>,
    title: &str,
    description: Option<&str>,
    user_story: Option<&str>,
    tech_stack: Option<&str>,
    now: &str,
) -> Built {
    Query::insert()
        .into_table(Projects::Table)
        .columns([
            Projects::Id,
            Projects::UserId,
            Projects::IdeaOriginId,
            Projects::Title,
            Projects::Description,
            Projects::UserStory,
            Projects::TechStack,
            Projects::CreatedAt,
            Projects::UpdatedAt,
        ])
        .values_panic([
            id.into(),
            user_id.into(),
            idea_origin_id.map(|s| s.to_string()).into(),
            title.into(),
            description.map(|s| s.to_string()).into(),
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
        .from(Projects::Table)
        .and_where(Expr::col(Projects::Id).eq(id))
        .and_where(Expr::col(Projects::UserId).eq(user_id))
        .build(SqliteQueryBuilder)
}

/// Active projects for an owner, newest first.
pub fn list_active(user_id: &str) -> Built {
    Query::select()
        .column(Asterisk)
        .from(Projects::Table)
        .and_where(Expr::col(Projects::UserId).eq(user_id))
        .and_where(Expr::col(Projects::ArchivedAt).is_null())
        .order_by(Projects::CreatedAt, Order::Desc)
        .build(SqliteQueryBuilder)
}

/// Apply only the supplied fields, including GitHub repo linkage.
pub fn update(id: &str, user_id: &str, fields: &UpdateProjectRequest, now: &str) -> Built {
    let mut stmt = Query::update();
    stmt.table(Projects::Table);
    if let Some(title) = &fields.title {
        stmt.value(Projects::Title, title.as_str());
    }
    if let Some(description) = &fields.description {
        stmt.value(Projects::Description, description.as_str());
    }
    if let Some(user_story) = &fields.user_story {
        stmt.value(Projects::UserStory, user_story.as_str());
    }
    if let Some(tech_stack) = &fields.tech_stack {
        stmt.value(Projects::TechStack, tech_stack.as_str());
    }
    if let Some(url) = &fields.github_repo_url {
        stmt.value(Projects::GithubRepoUrl, url.as_str());
    }
    if let Some(name) = &fields.github_repo_name {
        stmt.value(Projects::GithubRepoName, name.as_str());
    }
    if let Some(owner) = &fields.github_repo_owner {
        stmt.value(Projects::GithubRepoOwner, owner.as_str());
    }
    stmt.value(Projects::UpdatedAt, now)
        .and_where(Expr::col(Projects::Id).eq(id))
        .and_where(Expr::col(Projects::UserId).eq(user_id))
        .returning_all()
        .build(SqliteQueryBuilder)
}

/// Stamp `archived_at` only when still active (idempotent archive).
pub fn archive(id: &str, user_id: &str, now: &str) -> Built {
    Query::update()
        .table(Projects::Table)
        .value(Projects::ArchivedAt, now)
        .and_where(Expr::col(Projects::Id).eq(id))
        .and_where(Expr::col(Projects::UserId).eq(user_id))
        .and_where(Expr::col(Projects::ArchivedAt).is_null())
        .build(SqliteQueryBuilder)
}

pub fn exists(id: &str, user_id: &str) -> Built {
    Query::select()
        .expr(Expr::expr(Func::count(Expr::col(Asterisk))).gt(0))
        .from(Projects::Table)
        .and_where(Expr::col(Projects::Id).eq(id))
        .and_where(Expr::col(Projects::UserId).eq(user_id))
        .build(SqliteQueryBuilder)
}

/// Hard delete. Statuses and tasks cascade away with the project.
pub fn delete(id: &str, user_id: &str) -> Built {
    Query::delete()
        .from_table(Projects::Table)
        .and_where(Expr::col(Projects::Id).eq(id))
        .and_where(Expr::col(Projects::UserId).eq(user_id))
        .returning(Query::returning().column(Projects::Id))
        .build(SqliteQueryBuilder)
}
