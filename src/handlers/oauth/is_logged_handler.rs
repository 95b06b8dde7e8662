use crate::handlers::session_token;
use crate::models::github::LoginStatus;
use axum::{Json, http::HeaderMap};

/// `GET /github/is-logged`: reports whether a session cookie is present.
///
/// Presence only. The token is not checked against GitHub, so a revoked
/// token still reads as logged in until a proxied call fails.
pub async fn is_logged_handler(headers: HeaderMap) -> Json<LoginStatus> {
    let logged_in = session_token(&headers).is_some();
    tracing::debug!(logged_in, "checked login status");
    Json(LoginStatus { logged_in })
}
