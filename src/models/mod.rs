pub mod app_config;
pub mod github;
pub mod oauth;

pub use app_config::{AppConfig, AppState, ConfigError};
