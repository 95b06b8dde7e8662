//! Route table and middleware stack.

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    callback_handler, is_logged_handler, login_handler, repos_handler, star_handler,
    starred_list_handler,
};
use crate::models::{AppConfig, AppState};

pub fn router(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.config);

    let router = Router::new()
        .route("/github/login", get(login_handler))
        .route("/github/callback", get(callback_handler))
        .route("/github/is-logged", get(is_logged_handler))
        .route("/github/repos", get(repos_handler))
        .route("/github/starred-list", get(starred_list_handler))
        .route("/github/star", post(star_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// Lets the frontend call the proxy with its cookies attached.
fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    let origin = config.frontend_url.origin().ascii_serialization();
    match HeaderValue::from_str(&origin) {
        Ok(origin) => Some(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([CONTENT_TYPE]),
        ),
        Err(e) => {
            tracing::warn!(error = %e, %origin, "frontend origin unusable; CORS disabled");
            None
        }
    }
}
