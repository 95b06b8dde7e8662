pub mod github;
pub mod oauth;

pub use github::{repos_handler, star_handler, starred_list_handler};
pub use oauth::{callback_handler, is_logged_handler, login_handler};

use axum::{
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{LOCATION, SET_COOKIE},
    },
    response::{IntoResponse, Response},
};
use oauth2::AccessToken;

use crate::cookies::{CookieMap, SESSION_COOKIE};

// An empty `gh_token` counts as no session.
pub(crate) fn session_token(headers: &HeaderMap) -> Option<AccessToken> {
    CookieMap::from_headers(headers)
        .get(SESSION_COOKIE)
        .filter(|token| !token.is_empty())
        .map(|token| AccessToken::new(token.to_owned()))
}

// `axum::response::Redirect` has no 302 constructor.
pub(crate) fn found<I>(location: &str, cookies: I) -> Response
where
    I: IntoIterator<Item = String>,
{
    let location = match HeaderValue::from_str(location) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(error = %e, "redirect target is not a valid header value");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut response = StatusCode::FOUND.into_response();
    let headers = response.headers_mut();
    headers.insert(LOCATION, location);
    for cookie in cookies {
        match HeaderValue::try_from(cookie) {
            Ok(value) => {
                headers.append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, "dropping unencodable Set-Cookie value"),
        }
    }
    response
}
