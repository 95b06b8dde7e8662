use crate::error::ApiError;
use crate::handlers::session_token;
use crate::models::AppState;
use crate::models::github::StarredListResponse;
use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde_json::Value;

// Rendered in the list shape on every path.
#[derive(Debug)]
pub struct StarredListError(ApiError);

impl From<ApiError> for StarredListError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl From<reqwest::Error> for StarredListError {
    fn from(err: reqwest::Error) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for StarredListError {
    fn into_response(self) -> Response {
        let error = match &self.0 {
            ApiError::Transport(message) => Some(message.clone()),
            _ => None,
        };
        (self.0.status(), Json(StarredListResponse::unauthed(error))).into_response()
    }
}

pub async fn starred_list_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StarredListResponse>, StarredListError> {
    let token = session_token(&headers).ok_or(ApiError::Unauthenticated)?;

    let response = app_state
        .github
        .list_starred(&token)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "GitHub API error fetching starred list"))?;

    let status = response.status();
    if !status.is_success() {
        tracing::error!(%status, "GitHub starred-list error");
        return Err(ApiError::Upstream {
            status,
            message: "GitHub starred-list error".to_string(),
        }
        .into());
    }

    let repos = response
        .json::<Value>()
        .await
        .inspect_err(|e| tracing::error!(error = %e, "unreadable starred-list body"))?;

    Ok(Json(StarredListResponse {
        authed: true,
        repos,
        error: None,
    }))
}
