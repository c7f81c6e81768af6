//! Spark query builders. All statements are owner-scoped.

use sea_query::{Asterisk, Expr, Func, Order, Query, SqliteQueryBuilder};

use super::tables::Sparks;
use super::Built;

pub fn insert(id: &str, user_id: &str, title: &str, now: &str) -> Built {
    Query::insert()
        .into_table(Sparks::Table)
        .columns([
            Sparks::Id,
            Sparks::UserId,
            Sparks::Title,
            Sparks::CreatedAt,
            Sparks::UpdatedAt,
        ])
        .values_panic([
            id.into(),
            user_id.into(),
            title.into(),
            now.into(),
            now.into(),
        ])
        .returning_all()
        .build(SqliteQueryBuilder)
}

pub fn get(id: &str, user_id: &str) -> Built {
    Query::select()
        .column(Asterisk)
        .from(Sparks::Table)
        .and_where(Expr::col(Sparks::Id).eq(id))
        .and_where(Expr::col(Sparks::UserId).eq(user_id))
        .build(SqliteQueryBuilder)
}

/// Active sparks for an owner, newest first.
pub fn list_active(user_id: &str) -> Built {
    Query::select()
        .column(Asterisk)
        .from(Sparks::Table)
        .and_where(Expr::col(Sparks::UserId).eq(user_id))
        .and_where(Expr::col(Sparks::ArchivedAt).is_null())
        .order_by(Sparks::CreatedAt, Order::Desc)
        .build(SqliteQueryBuilder)
}

/// Stamp `archived_at` only when still active — a second archive matches
/// zero rows and leaves the original timestamp in place.
pub fn archive(id: &str, user_id: &str, now: &str) -> Built {
    Query::update()
        .table(Sparks::Table)
        .value(Sparks::ArchivedAt, now)
        .and_where(Expr::col(Sparks::Id).eq(id))
        .and_where(Expr::col(Sparks::UserId).eq(user_id))
        .and_where(Expr::col(Sparks::ArchivedAt).is_null())
        .build(SqliteQueryBuilder)
}

pub fn exists(id: &str, user_id: &str) -> Built {
    Query::select()
        .expr(Expr::expr(Func::count(Expr::col(Asterisk))).gt(0))
        .from(Sparks::Table)
        .and_where(Expr::col(Sparks::Id).eq(id))
        .and_where(Expr::col(Sparks::UserId).eq(user_id))
        .build(SqliteQueryBuilder)
}

/// Hard delete. Ideas referencing this spark keep their row; the FK rule
/// clears `spark_origin_id`.
pub fn delete(id: &str, user_id: &str) -> Built {
    Query::delete()
        .from_table(Sparks::Table)
        .and_where(Expr::col(Sparks::Id).eq(id))
        .and_where(Expr::col(Sparks::UserId).eq(user_id))
        .returning(Query::returning().column(Sparks::Id))
        .build(SqliteQueryBuilder)
}
