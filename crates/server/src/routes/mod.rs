pub mod auth;
pub mod github_oauth;
pub mod health;
pub mod ideas;
pub mod projects;
pub mod sparks;
pub mod statuses;
pub mod tasks;
