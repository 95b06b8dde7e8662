//! `Cookie` / `Set-Cookie` header codec.
//!
//! Every handler reads cookies through [`CookieMap`] and writes them through
//! [`set_cookie`] / [`expire_cookie`], so parsing and attribute rules live in
//! one place.

use std::collections::HashMap;

use axum::http::{HeaderMap, header::COOKIE};
use cookie::{Cookie, SameSite};
use time::Duration;

pub const STATE_COOKIE: &str = "oauth_state";

pub const SESSION_COOKIE: &str = "gh_token";

pub const STATE_COOKIE_TTL: Duration = Duration::minutes(10);

/// Cookies sent by the user agent, keyed by name.
///
/// When a name appears more than once the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieMap(HashMap<String, String>);

impl CookieMap {
    pub fn parse(header: &str) -> Self {
        let mut map = Self::default();
        map.extend_from_header(header);
        map
    }

    // HTTP/2 clients may split cookies across several header lines.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut map = Self::default();
        for value in headers.get_all(COOKIE) {
            // A non-ASCII pair set by another script must not hide the rest.
            map.extend_from_header(&String::from_utf8_lossy(value.as_bytes()));
        }
        map
    }

    fn extend_from_header(&mut self, header: &str) {
        for parsed in Cookie::split_parse_encoded(header) {
            match parsed {
                Ok(cookie) => self.insert(cookie.name(), cookie.value()),
                Err(e) => tracing::trace!(error = %e, "skipping malformed cookie pair"),
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Empty names are ignored: a `Cookie` header cannot carry them.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if name.is_empty() {
            tracing::debug!("ignoring cookie with empty name");
            return;
        }
        self.0.insert(name, value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // Sorted by name so the output is stable.
    pub fn to_header(&self) -> String {
        let mut names: Vec<&String> = self.0.keys().collect();
        names.sort();
        names
            .into_iter()
            .map(|name| {
                Cookie::new(name.as_str(), self.0[name].as_str())
                    .encoded()
                    .stripped()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CookieMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

fn base_cookie(name: &str, value: &str) -> Cookie<'static> {
    Cookie::build((name.to_owned(), value.to_owned()))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Builds a `Set-Cookie` value. Without `max_age` the cookie lives for the
/// browser session.
pub fn set_cookie(name: &str, value: &str, max_age: Option<Duration>) -> String {
    let mut cookie = base_cookie(name, value);
    if let Some(max_age) = max_age {
        cookie.set_max_age(max_age);
    }
    cookie.encoded().to_string()
}

/// Builds a `Set-Cookie` value that deletes `name` on the client.
pub fn expire_cookie(name: &str) -> String {
    let mut cookie = base_cookie(name, "");
    cookie.make_removal();
    cookie.encoded().to_string()
}
