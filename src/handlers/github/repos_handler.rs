use crate::error::ApiError;
use crate::models::AppState;
use axum::{Json, extract::State};
use serde_json::Value;

/// `GET /github/repos`: repositories of the configured account.
///
/// Unlike the other proxy routes this one ignores the caller's session. It
/// uses `GITHUB_TOKEN` when set and falls back to anonymous access otherwise.
pub async fn repos_handler(State(app_state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let config = &app_state.config;
    let Some(username) = config.github_username.as_deref() else {
        tracing::error!("GITHUB_USERNAME is not set");
        return Err(ApiError::Config(
            "GITHUB_USERNAME is not defined in environment variables".to_string(),
        ));
    };

    let response = app_state
        .github
        .list_user_repos(username, config.github_token.as_ref())
        .await
        .map_err(internal_error)?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        tracing::error!(%status, body = %text, "GitHub API error listing repositories");
        return Err(ApiError::Upstream {
            status,
            message: format!("GitHub API error: {text}"),
        });
    }

    let repos = response.json::<Value>().await.map_err(internal_error)?;
    Ok(Json(repos))
}

fn internal_error(e: reqwest::Error) -> ApiError {
    tracing::error!(error = %e, "error fetching GitHub repositories");
    ApiError::Transport(format!("Internal server error: {}", e.without_url()))
}
