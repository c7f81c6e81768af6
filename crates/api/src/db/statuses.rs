//! Project status query builders.
//!
//! By-id statements scope ownership through the parent project, so a status
//! id belonging to another user behaves exactly like a missing one.

use sea_query::{Asterisk, Expr, Order, Query, SqliteQueryBuilder};

use crate::UpdateStatusRequest;

use super::tables::{Projects, ProjectStatuses};
use super::Built;

fn owned_project_ids(user_id: &str) -> sea_query::SelectStatement {
    Query::select()
        .column(Projects::Id)
        .from(Projects::Table)
        .and_where(Expr::col(Projects::UserId).eq(user_id))
        .take()
}

pub fn insert(id: &str, project_id: &str, name: &str, color: &str, sort_order: i64) -> Built {
    Query::insert()
        .into_table(ProjectStatuses::Table)
        .columns([
            ProjectStatuses::Id,
            ProjectStatuses::ProjectId,
            ProjectStatuses::Name,
            ProjectStatuses::Color,
            ProjectStatuses::SortOrder,
        ])
        .values_panic([
            id.into(),
            project_id.into(),
            name.into(),
            color.into(),
            sort_order.into(),
        ])
        .returning_all()
        .build(SqliteQueryBuilder)
}

pub fn get(id: &str, user_id: &str) -> Built {
    Query::select()
        .column(Asterisk)
        .from(ProjectStatuses::Table)
        .and_where(Expr::col(ProjectStatuses::Id).eq(id))
        .and_where(Expr::col(ProjectStatuses::ProjectId).in_subquery(owned_project_ids(user_id)))
        .build(SqliteQueryBuilder)
}

/// Statuses of a project in workflow order.
pub fn list(project_id: &str) -> Built {
    Query::select()
        .column(Asterisk)
        .from(ProjectStatuses::Table)
        .and_where(Expr::col(ProjectStatuses::ProjectId).eq(project_id))
        .order_by(ProjectStatuses::SortOrder, Order::Asc)
        .build(SqliteQueryBuilder)
}

pub fn update(id: &str, user_id: &str, fields: &UpdateStatusRequest) -> Built {
    let mut stmt = Query::update();
    stmt.table(ProjectStatuses::Table);
    if let Some(name) = &fields.name {
        stmt.value(ProjectStatuses::Name, name.as_str());
    }
    if let Some(color) = &fields.color {
        stmt.value(ProjectStatuses::Color, color.as_str());
    }
    if let Some(sort_order) = fields.sort_order {
        stmt.value(ProjectStatuses::SortOrder, sort_order);
    }
    stmt.and_where(Expr::col(ProjectStatuses::Id).eq(id))
        .and_where(Expr::col(ProjectStatuses::ProjectId).in_subquery(owned_project_ids(user_id)))
        .returning_all()
        .build(SqliteQueryBuilder)
}

/// Hard delete. Tasks referencing this status keep their row; the FK rule
/// clears `status_id`.
pub fn delete(id: &str, user_id: &str) -> Built {
    Query::delete()
        .from_table(ProjectStatuses::Table)
        .and_where(Expr::col(ProjectStatuses::Id).eq(id))
        .and_where(Expr::col(ProjectStatuses::ProjectId).in_subquery(owned_project_ids(user_id)))
        .returning(Query::returning().column(ProjectStatuses::Id))
        .build(SqliteQueryBuilder)
}
