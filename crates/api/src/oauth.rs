//! GitHub OAuth support: URL builders and response parsing.
//!
//! This module contains only types and pure functions. The HTTP calls and
//! the user upsert live in the server.

use serde::Deserialize;

use crate::ServiceError;

pub const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
pub const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
pub const GITHUB_USER_URL: &str = "https://api.github.com/user";
pub const GITHUB_SCOPES: &str = "read:user,user:email";

/// GitHub OAuth app credentials, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct GitHubOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
}

/// GitHub `/user` profile fields we consume.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubProfile {
    pub id: i64,
    pub login: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

impl GitHubProfile {
    /// The stable external identity the user row is keyed on.
    pub fn external_id(&self) -> String {
        self.id.to_string()
    }
}

/// Build the authorize URL the user's browser is redirected to.
pub fn build_authorize_url(config: &GitHubOAuthConfig, redirect_uri: &str) -> String {
    format!(
        "{GITHUB_AUTHORIZE_URL}?client_id={}&redirect_uri={}&scope={}",
        urlencoding::encode(&config.client_id),
        urlencoding::encode(redirect_uri),
        urlencoding::encode(GITHUB_SCOPES),
    )
}

/// Token exchange body as `application/x-www-form-urlencoded` pairs.
pub fn build_token_request_form(
    config: &GitHubOAuthConfig,
    code: &str,
) -> Vec<(&'static str, String)> {
    vec![
        ("client_id", config.client_id.clone()),
        ("client_secret", config.client_secret.clone()),
        ("code", code.to_string()),
    ]
}

/// Parse `access_token` from a token exchange response.
///
/// GitHub returns JSON when `Accept: application/json` is sent; errors come
/// back as `{"error": ..., "error_description": ...}` with HTTP 200.
pub fn parse_access_token_response(raw: &str) -> Result<String, ServiceError> {
    let body = raw.trim();
    if body.is_empty() {
        return Err(ServiceError::Internal(
            "OAuth token exchange failed: empty response body".into(),
        ));
    }

    let json: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        ServiceError::Internal(format!("OAuth token exchange failed: invalid JSON: {e}"))
    })?;

    if let Some(token) = json
        .get("access_token")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return Ok(token.to_string());
    }

    let err = json.get("error").and_then(|v| v.as_str());
    let desc = json.get("error_description").and_then(|v| v.as_str());
    let detail = match (err, desc) {
        (Some(e), Some(d)) if !d.is_empty() => format!("{e}: {d}"),
        (Some(e), _) => e.to_string(),
        (_, Some(d)) if !d.is_empty() => d.to_string(),
        _ => "no access_token field in response".to_string(),
    };

    Err(ServiceError::Internal(format!(
        "OAuth token exchange failed: {detail}"
    )))
}
