use std::net::SocketAddr;
use std::sync::Arc;

use oauth2::url::{self, Url};
use oauth2::{AccessToken, ClientId, ClientSecret, RedirectUrl};
use thiserror::Error;

use crate::github::GitHubClient;

pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
pub const DEFAULT_OAUTH_URL: &str = "https://github.com";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:10000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} is not a valid URL: {source}")]
    InvalidUrl {
        key: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("{key} must be an absolute http(s) URL, got {value}")]
    UnsupportedUrl { key: &'static str, value: String },

    #[error("BIND_ADDR is not a valid socket address: {0}")]
    InvalidBindAddr(#[from] std::net::AddrParseError),
}

/// Process configuration, read once at start-up. Missing OAuth and account
/// settings surface as 500s from the routes that need them.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client_id: Option<ClientId>,
    pub client_secret: Option<ClientSecret>,
    pub redirect_uri: Option<RedirectUrl>,
    pub github_username: Option<String>,
    // Only used by the public repository listing.
    pub github_token: Option<AccessToken>,
    // Post-login redirect target and CORS origin.
    pub frontend_url: Url,
    pub oauth_base_url: Url,
    pub api_base_url: Url,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        use dotenvy::dotenv;
        use std::env;

        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    // Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let redirect_uri = var("GITHUB_REDIRECT_URI")
            .map(RedirectUrl::new)
            .transpose()
            .map_err(|source| ConfigError::InvalidUrl {
                key: "GITHUB_REDIRECT_URI",
                source,
            })?;

        let base_url = |key: &'static str, default: &str| -> Result<Url, ConfigError> {
            let value = var(key).unwrap_or_else(|| default.to_string());
            let url = Url::parse(&value).map_err(|source| ConfigError::InvalidUrl { key, source })?;
            if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::UnsupportedUrl { key, value });
            }
            Ok(url)
        };

        let bind_addr: SocketAddr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()?;

        Ok(Self {
            client_id: var("GITHUB_CLIENT_ID").map(ClientId::new),
            client_secret: var("GITHUB_CLIENT_SECRET").map(ClientSecret::new),
            redirect_uri,
            github_username: var("GITHUB_USERNAME"),
            github_token: var("GITHUB_TOKEN").map(AccessToken::new),
            frontend_url: base_url("FRONTEND_URL", DEFAULT_FRONTEND_URL)?,
            oauth_base_url: base_url("GITHUB_OAUTH_URL", DEFAULT_OAUTH_URL)?,
            api_base_url: base_url("GITHUB_API_URL", DEFAULT_API_URL)?,
            bind_addr,
        })
    }

    pub fn warn_missing(&self) {
        let missing = [
            ("GITHUB_CLIENT_ID", self.client_id.is_none()),
            ("GITHUB_CLIENT_SECRET", self.client_secret.is_none()),
            ("GITHUB_REDIRECT_URI", self.redirect_uri.is_none()),
            ("GITHUB_USERNAME", self.github_username.is_none()),
        ];
        for (key, is_missing) in missing {
            if is_missing {
                tracing::warn!(key, "configuration value not set; dependent routes will fail");
            }
        }
        if self.github_token.is_none() {
            tracing::info!("GITHUB_TOKEN not set; repository listing uses anonymous access");
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub github: GitHubClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, reqwest::Error> {
        let github = GitHubClient::new(
            config.oauth_base_url.clone(),
            config.api_base_url.clone(),
        )?;
        Ok(Self {
            config: Arc::new(config),
            github,
        })
    }
}
