//! Task query builders. Ownership is scoped through the parent project,
//! same as statuses.

use sea_query::{Asterisk, Expr, Order, Query, SqliteQueryBuilder};

use crate::UpdateTaskRequest;

use super::tables::{Projects, Tasks};
use super::Built;

fn owned_project_ids(user_id: &str) -> sea_query::SelectStatement {
    Query::select()
        .column(Projects::Id)
        .from(Projects::Table)
        .and_where(Expr::col(Projects::UserId).eq(user_id))
        .take()
}

#[allow(clippy::too_many_arguments)]
pub fn insert(
    id: &str,
    project_id: &str,
    status_id: Option<&str>,
    title: &str,
    description: Option<&str>,
    branch_name: Option<&str>,
    sort_order: i64,
    now: &str,
) -> Built {
    Query::insert()
        .into_table(Tasks::Table)
        .columns([
            Tasks::Id,
            Tasks::ProjectId,
            Tasks::StatusId,
            Tasks::Title,
            Tasks::Description,
            Tasks::BranchName,
            Tasks::SortOrder,
            Tasks::CreatedAt,
            Tasks::UpdatedAt,
        ])
        .values_panic([
            id.into(),
            project_id.into(),
            status_id.map(|s| s.to_string()).into(),
            title.into(),
            description.map(|s| s.to_string()).into(),
            branch_name.map(|s| s.to_string()).into(),
            sort_order.into(),
            now.into(),
            now.into(),
        ])
        .returning_all()
        .build(SqliteQueryBuilder)
}

/// Tasks of a project in board order.
pub fn list(project_id: &str) -> Built {
    Query::select()
        .column(Asterisk)
        .from(Tasks::Table)
        .and_where(Expr::col(Tasks::ProjectId).eq(project_id))
        .order_by(Tasks::SortOrder, Order::Asc)
        .order_by(Tasks::CreatedAt, Order::Asc)
        .build(SqliteQueryBuilder)
}

/// Apply only the supplied fields. `status_id: Some(None)` moves the task
/// out of any status; absent leaves it alone.
pub fn update(id: &str, user_id: &str, fields: &UpdateTaskRequest, now: &str) -> Built {
    let mut stmt = Query::update();
    stmt.table(Tasks::Table);
    if let Some(title) = &fields.title {
        stmt.value(Tasks::Title, title.as_str());
    }
    if let Some(description) = &fields.description {
        stmt.value(Tasks::Description, description.as_str());
    }
    if let Some(status_id) = &fields.status_id {
        stmt.value(Tasks::StatusId, status_id.clone());
    }
    if let Some(branch_name) = &fields.branch_name {
        stmt.value(Tasks::BranchName, branch_name.as_str());
    }
    if let Some(sort_order) = fields.sort_order {
        stmt.value(Tasks::SortOrder, sort_order);
    }
    stmt.value(Tasks::UpdatedAt, now)
        .and_where(Expr::col(Tasks::Id).eq(id))
        .and_where(Expr::col(Tasks::ProjectId).in_subquery(owned_project_ids(user_id)))
        .returning_all()
        .build(SqliteQueryBuilder)
}

pub fn delete(id: &str, user_id: &str) -> Built {
    Query::delete()
        .from_table(Tasks::Table)
        .and_where(Expr::col(Tasks::Id).eq(id))
        .and_where(Expr::col(Tasks::ProjectId).in_subquery(owned_project_ids(user_id)))
        .returning(Query::returning().column(Tasks::Id))
        .build(SqliteQueryBuilder)
}
