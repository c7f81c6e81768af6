//! Compile-time–checked column identifiers for all tables.
//!
//! Variant order after `Table` matches the schema column order — the row
//! mappers rely on it for `SELECT *` and `RETURNING *`.

use sea_query::Iden;

#[derive(Iden)]
pub enum Users {
    Table,
    Id,
    GithubId,
    Username,
    Email,
    AvatarUrl,
    ApiKey,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Sparks {
    Table,
    Id,
    UserId,
    Title,
    CreatedAt,
    UpdatedAt,
    ArchivedAt,
}

#[derive(Iden)]
pub enum Ideas {
    Table,
    Id,
    UserId,
    SparkOriginId,
    Title,
    Description,
    Notes,
    UserStory,
    TechStack,
    CreatedAt,
    UpdatedAt,
    ArchivedAt,
}

#[derive(Iden)]
pub enum Projects {
    Table,
    Id,
    UserId,
    IdeaOriginId,
    Title,
    Description,
    UserStory,
    TechStack,
    GithubRepoUrl,
    GithubRepoName,
    GithubRepoOwner,
    CreatedAt,
    UpdatedAt,
    ArchivedAt,
}

#[derive(Iden)]
pub enum ProjectStatuses {
    Table,
    Id,
    ProjectId,
    Name,
    Color,
    SortOrder,
}

#[derive(Iden)]
pub enum Tasks {
    Table,
    Id,
    ProjectId,
    StatusId,
    Title,
    Description,
    BranchName,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}
