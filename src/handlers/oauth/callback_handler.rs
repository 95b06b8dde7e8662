use crate::cookies::{self, CookieMap, SESSION_COOKIE, STATE_COOKIE};
use crate::github::TokenExchangeError;
use crate::handlers::found;
use crate::models::AppState;
use crate::models::oauth::CallbackParams;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use oauth2::{AccessToken, AuthorizationCode};

/// Terminal states of `GET /github/callback`.
#[derive(Debug)]
pub enum CallbackOutcome {
    MissingParameters,
    // Also covers an absent `oauth_state` cookie.
    StateMismatch,
    ExchangeFailed(TokenExchangeError),
    Authorized {
        token: AccessToken,
        redirect_to: String,
    },
}

impl IntoResponse for CallbackOutcome {
    fn into_response(self) -> Response {
        match self {
            CallbackOutcome::MissingParameters => {
                (StatusCode::BAD_REQUEST, "Missing OAuth code or state.").into_response()
            }
            CallbackOutcome::StateMismatch => {
                (StatusCode::BAD_REQUEST, "Invalid OAuth state.").into_response()
            }
            CallbackOutcome::ExchangeFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(SET_COOKIE, cookies::expire_cookie(STATE_COOKIE))],
                "GitHub OAuth token exchange failed",
            )
                .into_response(),
            CallbackOutcome::Authorized { token, redirect_to } => found(
                &redirect_to,
                [
                    cookies::set_cookie(SESSION_COOKIE, token.secret(), None),
                    cookies::expire_cookie(STATE_COOKIE),
                ],
            ),
        }
    }
}

pub async fn callback_handler(
    State(app_state): State<AppState>,
    Query(params): Query<CallbackParams>,
    headers: HeaderMap,
) -> CallbackOutcome {
    let cookies = CookieMap::from_headers(&headers);
    complete_authorization(&app_state, params, cookies.get(STATE_COOKIE)).await
}

async fn complete_authorization(
    app_state: &AppState,
    params: CallbackParams,
    stored_state: Option<&str>,
) -> CallbackOutcome {
    let Some((code, state)) = params.into_parts() else {
        tracing::warn!("OAuth callback without code or state");
        return CallbackOutcome::MissingParameters;
    };

    if stored_state != Some(state.as_str()) {
        tracing::warn!(
            state_cookie_present = stored_state.is_some(),
            "OAuth state mismatch; rejecting callback"
        );
        return CallbackOutcome::StateMismatch;
    }

    let config = &app_state.config;
    let (Some(client_id), Some(client_secret), Some(redirect_uri)) =
        (&config.client_id, &config.client_secret, &config.redirect_uri)
    else {
        tracing::error!("OAuth callback received but client credentials are not configured");
        return CallbackOutcome::ExchangeFailed(TokenExchangeError::NotConfigured);
    };

    let code = AuthorizationCode::new(code);
    match app_state
        .github
        .exchange_code(client_id, client_secret, redirect_uri, &code)
        .await
    {
        Ok(token) => {
            tracing::info!("GitHub login completed");
            CallbackOutcome::Authorized {
                token,
                redirect_to: config.frontend_url.to_string(),
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to exchange GitHub authorization code");
            CallbackOutcome::ExchangeFailed(e)
        }
    }
}
