use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};

use kindling_api::oauth::{
    self, GitHubOAuthConfig, GitHubProfile, GITHUB_TOKEN_URL, GITHUB_USER_URL,
};

use crate::lineage;
use crate::storage::Db;
use crate::AppConfig;

#[derive(serde::Deserialize)]
pub struct CallbackQuery {
    code: String,
}

fn not_configured() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(serde_json::json!({"error": "GitHub OAuth not configured"})),
    )
        .into_response()
}

fn failure_redirect(base_url: &str) -> Response {
    Redirect::temporary(&format!("{base_url}/login?error=oauth_failed")).into_response()
}

/// GET /api/auth/github — redirect to GitHub OAuth.
pub async fn github_login(State(config): State<AppConfig>) -> Response {
    let Some(oauth_config) = &config.github_oauth else {
        return not_configured();
    };

    let redirect_uri = format!("{}/api/auth/github/callback", config.base_url);
    let url = oauth::build_authorize_url(oauth_config, &redirect_uri);
    Redirect::temporary(&url).into_response()
}

/// GET /api/auth/github/callback?code=... — exchange code for token, upsert user.
pub async fn github_callback(
    State(db): State<Db>,
    State(config): State<AppConfig>,
    Query(q): Query<CallbackQuery>,
) -> Response {
    let Some(oauth_config) = &config.github_oauth else {
        return not_configured();
    };
    let base_url = &config.base_url;

    let client = reqwest::Client::new();
    let token = match exchange_code(&client, oauth_config, &q.code).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("token exchange: {e}");
            return failure_redirect(base_url);
        }
    };

    let profile = match fetch_profile(&client, &token).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("github profile fetch: {e}");
            return failure_redirect(base_url);
        }
    };

    let conn = db.conn();
    let user = match lineage::upsert_user(&conn, &profile) {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("user upsert for github login {}: {e}", profile.login);
            return failure_redirect(base_url);
        }
    };

    tracing::info!("github login: {}", user.username);

    // Hand the api key to the frontend callback page.
    Redirect::temporary(&format!("{base_url}/auth/callback?api_key={}", user.api_key))
        .into_response()
}

async fn exchange_code(
    client: &reqwest::Client,
    config: &GitHubOAuthConfig,
    code: &str,
) -> anyhow::Result<String> {
    let body = client
        .post(GITHUB_TOKEN_URL)
        .header("Accept", "application/json")
        .form(&oauth::build_token_request_form(config, code))
        .send()
        .await?
        .text()
        .await?;

    oauth::parse_access_token_response(&body).map_err(|e| anyhow::anyhow!(e.message().to_string()))
}

async fn fetch_profile(client: &reqwest::Client, token: &str) -> anyhow::Result<GitHubProfile> {
    let profile = client
        .get(GITHUB_USER_URL)
        .header("Authorization", format!("Bearer {token}"))
        .header("User-Agent", "kindling-server")
        .send()
        .await?
        .json::<GitHubProfile>()
        .await?;
    Ok(profile)
}
