mod error;
mod lineage;
mod routes;
mod storage;

use axum::{
    extract::FromRef,
    routing::{delete, get, post, put},
    Router,
};
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use kindling_api::oauth::GitHubOAuthConfig;
use storage::Db;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: AppConfig,
}

/// Server configuration loaded from environment variables.
#[derive(Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub github_oauth: Option<GitHubOAuthConfig>,
}

impl FromRef<AppState> for Db {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

fn load_github_oauth() -> Option<GitHubOAuthConfig> {
    let client_id = std::env::var("GITHUB_CLIENT_ID")
        .ok()
        .filter(|s| !s.is_empty())?;
    let client_secret = std::env::var("GITHUB_CLIENT_SECRET")
        .ok()
        .filter(|s| !s.is_empty())?;
    tracing::info!("GitHub OAuth enabled");
    Some(GitHubOAuthConfig {
        client_id,
        client_secret,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kindling_server=info,tower_http=info".into()),
        )
        .init();

    // Data directory
    let data_dir = std::env::var("KINDLING_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"));

    tracing::info!("data directory: {}", data_dir.display());

    // Initialize database
    let db = storage::init_db(&data_dir)?;
    tracing::info!("database initialized");

    let base_url = std::env::var("BASE_URL")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "http://localhost:3000".into());

    let github_oauth = load_github_oauth();
    if github_oauth.is_none() {
        tracing::warn!("GITHUB_CLIENT_ID/GITHUB_CLIENT_SECRET not set — login is disabled");
    }

    let config = AppConfig {
        base_url: base_url.clone(),
        github_oauth,
    };

    let state = AppState { db, config };

    // Build API routes
    let api = Router::new()
        // Health
        .route("/health", get(routes::health::health))
        // Auth
        .route("/auth/github", get(routes::github_oauth::github_login))
        .route(
            "/auth/github/callback",
            get(routes::github_oauth::github_callback),
        )
        .route(
            "/auth/me",
            get(routes::auth::me).delete(routes::auth::delete_me),
        )
        // Sparks
        .route("/sparks", post(routes::sparks::create_spark))
        .route("/sparks", get(routes::sparks::list_sparks))
        .route("/sparks/{id}/archive", post(routes::sparks::archive_spark))
        .route("/sparks/{id}/promote", post(routes::sparks::promote_spark))
        .route("/sparks/{id}", delete(routes::sparks::delete_spark))
        // Ideas
        .route("/ideas", get(routes::ideas::list_ideas))
        .route(
            "/ideas/{id}",
            get(routes::ideas::get_idea)
                .put(routes::ideas::update_idea)
                .delete(routes::ideas::delete_idea),
        )
        .route("/ideas/{id}/archive", post(routes::ideas::archive_idea))
        .route("/ideas/{id}/promote", post(routes::ideas::promote_idea))
        // Projects
        .route("/projects", get(routes::projects::list_projects))
        .route(
            "/projects/{id}",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/projects/{id}/archive",
            post(routes::projects::archive_project),
        )
        // Statuses
        .route(
            "/projects/{id}/statuses",
            post(routes::statuses::create_status).get(routes::statuses::list_statuses),
        )
        .route("/statuses/{id}", put(routes::statuses::update_status))
        .route("/statuses/{id}", delete(routes::statuses::delete_status))
        // Tasks
        .route(
            "/projects/{id}/tasks",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route("/tasks/{id}", put(routes::tasks::update_task))
        .route("/tasks/{id}", delete(routes::tasks::delete_task));

    // Build main router
    let mut app = Router::new().nest("/api", api);

    // Serve static files from web build if present
    let web_dir = std::env::var("KINDLING_WEB_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("web/build"));
    if web_dir.exists() {
        tracing::info!("serving static files from {}", web_dir.display());
        let index_html = web_dir.join("index.html");
        app = app.fallback_service(ServeDir::new(&web_dir).fallback(ServeFile::new(index_html)));
    }

    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    tracing::info!("starting server at {base_url}");

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
