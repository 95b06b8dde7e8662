use crate::cookies::{self, STATE_COOKIE, STATE_COOKIE_TTL};
use crate::error::ApiError;
use crate::handlers::found;
use crate::models::AppState;
use axum::{extract::State, response::Response};
use oauth2::CsrfToken;

/// `GET /github/login`: starts the authorization-code flow.
///
/// The state token goes out twice, in the authorize URL and in the
/// `oauth_state` cookie; the callback only accepts the pair when both match.
pub async fn login_handler(State(app_state): State<AppState>) -> Result<Response, ApiError> {
    let config = &app_state.config;
    let (Some(client_id), Some(redirect_uri)) = (&config.client_id, &config.redirect_uri) else {
        tracing::error!("login requested but GITHUB_CLIENT_ID or GITHUB_REDIRECT_URI is not set");
        return Err(ApiError::Config(
            "Missing GitHub OAuth environment variables.".to_string(),
        ));
    };

    let csrf_token = CsrfToken::new_random();
    let authorize_url = app_state
        .github
        .authorize_url(client_id, redirect_uri, &csrf_token);
    let state_cookie = cookies::set_cookie(
        STATE_COOKIE,
        csrf_token.secret(),
        Some(STATE_COOKIE_TTL),
    );

    tracing::debug!("redirecting to GitHub authorization endpoint");
    Ok(found(authorize_url.as_str(), [state_cookie]))
}
