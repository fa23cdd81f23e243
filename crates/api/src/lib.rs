//! `api` crate: HTTP REST API layer.
//!
//! Exposes (all under `/api/v1` except the home page):
//!   GET    /
//!   GET    /api/v1/health_check
//!   POST   /api/v1/auth/register
//!   PATCH  /api/v1/auth/login
//!   PATCH  /api/v1/auth/refresh
//!   GET    /api/v1/users/me
//!   PATCH  /api/v1/users/me
//!   GET    /api/v1/users/{id}
//!   GET    /api/v1/users            (admin)
//!   POST   /api/v1/users            (admin)
//!   PUT    /api/v1/users/{id}       (admin)
//!   DELETE /api/v1/users/{id}       (admin)

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use auth::JwtService;
use db::DbPool;
use settings::Settings;

pub mod error;
pub mod extract;
pub mod handlers;
pub mod schemas;
pub mod service;

pub use error::ApiError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub settings: Arc<Settings>,
    pub jwt: JwtService,
}

impl AppState {
    pub fn new(pool: DbPool, settings: Settings) -> Self {
        let jwt = JwtService::new(
            &settings.jwt_access_secret,
            &settings.jwt_refresh_secret,
            settings.jwt_access_expire_minutes,
            settings.jwt_refresh_expire_minutes,
        );
        Self {
            pool,
            settings: Arc::new(settings),
            jwt,
        }
    }
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(handlers::health::routes())
        .merge(handlers::auth::routes())
        .merge(handlers::users::routes());

    Router::new()
        .route("/", get(handlers::home::home))
        .nest("/api/v1", api)
        .layer(cors_layer(&state.settings.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        // Credentials forbid a literal `*`; echo the caller's origin instead.
        AllowOrigin::mirror_request()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!("ignoring invalid CORS origin {o:?}");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
            Method::DELETE,
            Method::PATCH,
            Method::PUT,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::SET_COOKIE,
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            header::AUTHORIZATION,
        ])
}

/// Bind to `bind` and serve until Ctrl-C or SIGTERM.
pub async fn serve(bind: &str, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
