use crate::error::ApiError;
use crate::handlers::session_token;
use crate::models::AppState;
use crate::models::github::{ErrorResponse, StarRequest, StarResponse};
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;

#[derive(Debug)]
pub struct StarError(ApiError);

impl From<ApiError> for StarError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl From<reqwest::Error> for StarError {
    fn from(err: reqwest::Error) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for StarError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (self.0.status(), body).into_response()
    }
}

// Body before session: a malformed request is a 400 even when signed out.
pub async fn star_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<StarResponse>, StarError> {
    let (owner, repo) = serde_json::from_slice::<StarRequest>(&body)
        .ok()
        .and_then(StarRequest::into_target)
        .ok_or_else(|| ApiError::BadRequest("Missing owner or repo".to_string()))?;

    let token = session_token(&headers).ok_or(ApiError::Unauthenticated)?;

    tracing::info!(%owner, %repo, "starring repository");

    let star = app_state
        .github
        .star_repo(&token, &owner, &repo)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "star request failed"))?;

    if star.status() != StatusCode::NO_CONTENT {
        let status = star.status();
        let text = star.text().await.unwrap_or_default();
        tracing::warn!(%status, %owner, %repo, "GitHub refused star");
        let message = if text.is_empty() {
            "GitHub star failed".to_string()
        } else {
            text
        };
        return Err(ApiError::Upstream { status, message }.into());
    }

    let info: Value = app_state
        .github
        .get_repo(Some(&token), &owner, &repo)
        .await?
        .json()
        .await
        .inspect_err(|e| tracing::error!(error = %e, "failed to refresh star count"))?;

    let count = info.get("stargazers_count").and_then(Value::as_u64);
    Ok(Json(StarResponse { ok: true, count }))
}
