//! GitHub endpoints used by the broker and the proxy routes.
//!
//! The client holds no per-user state; every call takes the credential it
//! should present.

use oauth2::url::Url;
use oauth2::{AccessToken, AuthorizationCode, ClientId, ClientSecret, CsrfToken, RedirectUrl};
use reqwest::header::{ACCEPT, CONTENT_LENGTH};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use thiserror::Error;

use crate::models::oauth::TokenResponse;

/// The only scope this broker asks for.
pub const OAUTH_SCOPE: &str = "public_repo";

const USER_AGENT: &str = concat!("portfolio-api/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

/// Why the authorization code could not be turned into an access token.
///
/// Only ever logged; callers get a generic message.
#[derive(Debug, Error)]
pub enum TokenExchangeError {
    #[error("OAuth client credentials are not configured")]
    NotConfigured,

    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("token endpoint returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("token endpoint returned no access token (error: {error:?}, description: {description:?})")]
    MissingToken {
        error: Option<String>,
        description: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    oauth_base: Url,
    api_base: Url,
}

impl GitHubClient {
    pub fn new(oauth_base: Url, api_base: Url) -> Result<Self, reqwest::Error> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            oauth_base,
            api_base,
        })
    }

    /// Where the user agent is sent to grant consent.
    pub fn authorize_url(
        &self,
        client_id: &ClientId,
        redirect_uri: &RedirectUrl,
        state: &CsrfToken,
    ) -> Url {
        let mut url = endpoint(&self.oauth_base, &["login", "oauth", "authorize"]);
        url.query_pairs_mut()
            .append_pair("client_id", client_id.as_str())
            .append_pair("redirect_uri", redirect_uri.as_str())
            .append_pair("scope", OAUTH_SCOPE)
            .append_pair("state", state.secret());
        url
    }

    /// Trades an authorization code for an access token. One request, no retry.
    pub async fn exchange_code(
        &self,
        client_id: &ClientId,
        client_secret: &ClientSecret,
        redirect_uri: &RedirectUrl,
        code: &AuthorizationCode,
    ) -> Result<AccessToken, TokenExchangeError> {
        let url = endpoint(&self.oauth_base, &["login", "oauth", "access_token"]);
        let params = [
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.secret().as_str()),
            ("code", code.secret().as_str()),
            ("redirect_uri", redirect_uri.as_str()),
        ];

        let response = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            return Err(TokenExchangeError::Status { status, body });
        }

        let token: TokenResponse = response.json().await?;
        match token.access_token.filter(|t| !t.is_empty()) {
            Some(access_token) => Ok(AccessToken::new(access_token)),
            None => Err(TokenExchangeError::MissingToken {
                error: token.error,
                description: token.error_description,
            }),
        }
    }

    /// Public repositories of `username`, most recently updated first.
    pub async fn list_user_repos(
        &self,
        username: &str,
        token: Option<&AccessToken>,
    ) -> reqwest::Result<Response> {
        let mut url = endpoint(&self.api_base, &["users", username, "repos"]);
        url.query_pairs_mut()
            .append_pair("per_page", "100")
            .append_pair("sort", "updated");
        self.api_request(Method::GET, url, token).send().await
    }

    pub async fn list_starred(&self, token: &AccessToken) -> reqwest::Result<Response> {
        let url = endpoint(&self.api_base, &["user", "starred"]);
        self.api_request(Method::GET, url, Some(token)).send().await
    }

    /// GitHub answers `204 No Content` when the star was recorded.
    pub async fn star_repo(
        &self,
        token: &AccessToken,
        owner: &str,
        repo: &str,
    ) -> reqwest::Result<Response> {
        let url = endpoint(&self.api_base, &["user", "starred", owner, repo]);
        self.api_request(Method::PUT, url, Some(token))
            .header(CONTENT_LENGTH, 0)
            .send()
            .await
    }

    pub async fn get_repo(
        &self,
        token: Option<&AccessToken>,
        owner: &str,
        repo: &str,
    ) -> reqwest::Result<Response> {
        let url = endpoint(&self.api_base, &["repos", owner, repo]);
        self.api_request(Method::GET, url, token).send().await
    }

    fn api_request(&self, method: Method, url: Url, token: Option<&AccessToken>) -> RequestBuilder {
        let request = self
            .http
            .request(method, url)
            .header(ACCEPT, GITHUB_JSON)
            .header(API_VERSION_HEADER, API_VERSION);
        match token {
            Some(token) => request.bearer_auth(token.secret()),
            None => request,
        }
    }
}

/// Appends path segments to `base`, percent-encoding each one so a value
/// like `a/b` stays a single segment.
fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    // Bases are validated as http(s) in `AppConfig`, which always have a path.
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server_uri: &str) -> GitHubClient {
        let base = Url::parse(server_uri).unwrap();
        GitHubClient::new(base.clone(), base).unwrap()
    }

    fn credentials() -> (ClientId, ClientSecret, RedirectUrl) {
        (
            ClientId::new("client-1".to_string()),
            ClientSecret::new("secret-1".to_string()),
            RedirectUrl::new("https://app.example.com/github/callback".to_string()).unwrap(),
        )
    }

    #[test]
    fn endpoint_keeps_segments_intact() {
        let base = Url::parse("https://api.github.com").unwrap();
        let url = endpoint(&base, &["user", "starred", "a/b", "c d"]);
        assert_eq!(url.as_str(), "https://api.github.com/user/starred/a%2Fb/c%20d");
    }

    #[test]
    fn endpoint_respects_base_path() {
        let base = Url::parse("https://ghe.example.com/api/v3/").unwrap();
        let url = endpoint(&base, &["user", "starred"]);
        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/user/starred");
    }

    #[test]
    fn authorize_url_carries_client_scope_and_state() {
        let client = client_for("https://github.com");
        let (client_id, _, redirect_uri) = credentials();
        let state = CsrfToken::new("state-xyz".to_string());

        let url = client.authorize_url(&client_id, &redirect_uri, &state);

        assert_eq!(url.path(), "/login/oauth/authorize");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("client_id".into(), "client-1".into())));
        assert!(pairs.contains(&(
            "redirect_uri".into(),
            "https://app.example.com/github/callback".into()
        )));
        assert!(pairs.contains(&("scope".into(), "public_repo".into())));
        assert!(pairs.contains(&("state".into(), "state-xyz".into())));
    }

    #[tokio::test]
    async fn exchange_code_posts_credentials_and_returns_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .and(header("accept", "application/json"))
            .and(body_string_contains("client_id=client-1"))
            .and(body_string_contains("client_secret=secret-1"))
            .and(body_string_contains("code=the-code"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "access_token": "gho_abc",
                    "token_type": "bearer",
                    "scope": "public_repo"
                })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let (client_id, client_secret, redirect_uri) = credentials();
        let code = AuthorizationCode::new("the-code".to_string());

        let token = client
            .exchange_code(&client_id, &client_secret, &redirect_uri, &code)
            .await
            .unwrap();

        assert_eq!(token.secret(), "gho_abc");
    }

    #[tokio::test]
    async fn exchange_code_reports_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "bad_verification_code",
                "error_description": "The code passed is incorrect or expired."
            })))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let (client_id, client_secret, redirect_uri) = credentials();
        let code = AuthorizationCode::new("stale".to_string());

        let err = client
            .exchange_code(&client_id, &client_secret, &redirect_uri, &code)
            .await
            .unwrap_err();

        match err {
            TokenExchangeError::MissingToken { error, .. } => {
                assert_eq!(error.as_deref(), Some("bad_verification_code"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn exchange_code_reports_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let (client_id, client_secret, redirect_uri) = credentials();
        let code = AuthorizationCode::new("c".to_string());

        let err = client
            .exchange_code(&client_id, &client_secret, &redirect_uri, &code)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TokenExchangeError::Status { status, .. } if status == StatusCode::BAD_GATEWAY
        ));
    }

    #[tokio::test]
    async fn api_calls_send_bearer_and_github_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/starred"))
            .and(header("authorization", "Bearer gho_user"))
            .and(header("accept", GITHUB_JSON))
            .and(header(API_VERSION_HEADER, API_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let token = AccessToken::new("gho_user".to_string());

        let response = client.list_starred(&token).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
