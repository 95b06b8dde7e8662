//! Shared harness: a wiremock server stands in for both github.com and
//! api.github.com, and requests go through the real router.

#![allow(dead_code)]

use std::collections::HashMap;

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request, Response, header},
};
use portfolio_api::{AppConfig, AppState, router};
use serde_json::Value;
use wiremock::MockServer;

pub const CLIENT_ID: &str = "test-client-id";
pub const REDIRECT_URI: &str = "https://api.example.com/github/callback";
pub const FRONTEND_URL: &str = "http://localhost:3000/";
pub const USERNAME: &str = "octocat";

pub struct TestApp {
    pub github: MockServer,
    pub router: Router,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(&[]).await
    }

    /// Overrides replace the defaults; an empty value unsets a key.
    pub async fn spawn_with(overrides: &[(&str, &str)]) -> Self {
        let github = MockServer::start().await;

        let mut vars: HashMap<String, String> = [
            ("GITHUB_CLIENT_ID", CLIENT_ID),
            ("GITHUB_CLIENT_SECRET", "test-client-secret"),
            ("GITHUB_REDIRECT_URI", REDIRECT_URI),
            ("GITHUB_USERNAME", USERNAME),
            ("FRONTEND_URL", FRONTEND_URL),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        vars.insert("GITHUB_OAUTH_URL".to_string(), github.uri());
        vars.insert("GITHUB_API_URL".to_string(), github.uri());
        for (key, value) in overrides {
            vars.insert(key.to_string(), value.to_string());
        }

        let config = AppConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
        let router = router(AppState::new(config).unwrap());

        Self { github, router }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie_header(cookie));
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie_header(cookie));
        }
        self.send(request.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        use tower::ServiceExt;

        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn github_request_count(&self) -> usize {
        self.github
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}

/// Raw bytes, so tests can send the non-ASCII cookies browsers pass through.
fn cookie_header(cookie: &str) -> HeaderValue {
    HeaderValue::from_bytes(cookie.as_bytes()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn set_cookies<B>(response: &Response<B>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// Value of the named cookie among the response's `Set-Cookie` headers.
pub fn set_cookie_value<B>(response: &Response<B>, name: &str) -> Option<String> {
    set_cookies(response).into_iter().find_map(|header| {
        let cookie = cookie::Cookie::parse_encoded(header).ok()?;
        (cookie.name() == name).then(|| cookie.value().to_string())
    })
}
