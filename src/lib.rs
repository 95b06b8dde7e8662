//! GitHub OAuth broker and thin API proxy for a browser client.
//!
//! The access token lives only in the client's `gh_token` cookie; the server
//! keeps no session state between requests.

pub mod app;
pub mod cookies;
pub mod error;
pub mod github;
pub mod handlers;
pub mod models;

pub use app::router;
pub use error::ApiError;
pub use models::{AppConfig, AppState, ConfigError};
