//! User query builders. The upsert (insert-if-absent / update-if-present,
//! keyed on `github_id`) is composed from these by the server.

use sea_query::{Asterisk, Expr, Query, SqliteQueryBuilder};

use super::tables::Users;
use super::Built;

/// Find user by internal id.
pub fn get_by_id(user_id: &str) -> Built {
    Query::select()
        .column(Asterisk)
        .from(Users::Table)
        .and_where(Expr::col(Users::Id).eq(user_id))
        .build(SqliteQueryBuilder)
}

/// Find user by API key (request authentication).
pub fn get_by_api_key(api_key: &str) -> Built {
    Query::select()
        .column(Asterisk)
        .from(Users::Table)
        .and_where(Expr::col(Users::ApiKey).eq(api_key))
        .build(SqliteQueryBuilder)
}

/// Find user by GitHub identity.
pub fn get_by_github_id(github_id: &str) -> Built {
    Query::select()
        .column(Asterisk)
        .from(Users::Table)
        .and_where(Expr::col(Users::GithubId).eq(github_id))
        .build(SqliteQueryBuilder)
}

/// Insert a new user from a GitHub login.
pub fn insert(
    id: &str,
    github_id: &str,
    username: &str,
    email: Option<&str>,
    avatar_url: Option<&str>,
    api_key: &str,
    now: &str,
) -> Built {
    Query::insert()
        .into_table(Users::Table)
        .columns([
            Users::Id,
            Users::GithubId,
            Users::Username,
            Users::Email,
            Users::AvatarUrl,
            Users::ApiKey,
            Users::CreatedAt,
            Users::UpdatedAt,
        ])
        .values_panic([
            id.into(),
            github_id.into(),
            username.into(),
            email.map(|s| s.to_string()).into(),
            avatar_url.map(|s| s.to_string()).into(),
            api_key.into(),
            now.into(),
            now.into(),
        ])
        .returning_all()
        .build(SqliteQueryBuilder)
}

/// Refresh profile fields on a returning login.
pub fn update_profile(
    github_id: &str,
    username: &str,
    email: Option<&str>,
    avatar_url: Option<&str>,
    now: &str,
) -> Built {
    Query::update()
        .table(Users::Table)
        .value(Users::Username, username)
        .value(Users::Email, email.map(|s| s.to_string()))
        .value(Users::AvatarUrl, avatar_url.map(|s| s.to_string()))
        .value(Users::UpdatedAt, now)
        .and_where(Expr::col(Users::GithubId).eq(github_id))
        .returning_all()
        .build(SqliteQueryBuilder)
}

/// Hard-delete a user. Cascades to all owned sparks, ideas, and projects.
pub fn delete(user_id: &str) -> Built {
    Query::delete()
        .from_table(Users::Table)
        .and_where(Expr::col(Users::Id).eq(user_id))
        .returning(Query::returning().column(Users::Id))
        .build(SqliteQueryBuilder)
}
