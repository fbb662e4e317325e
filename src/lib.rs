use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

/// Shared per-process state: the connection pool. Everything else the
/// handlers need comes from the read-only config singleton.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}

/// Build the full application router.
///
/// Registration, the service index, the API docs and the health check are
/// public; every
/// other `/api/*` route sits behind the basic-auth middleware, which injects
/// the resolved `AuthUser` into request extensions before handlers run.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/auth/check", get(handlers::auth::check))
        .route("/api/auth/login", post(handlers::auth::login))
        .route(
            "/api/tasks",
            get(handlers::tasks::list).post(handlers::tasks::create),
        )
        .route(
            "/api/tasks/:id",
            get(handlers::tasks::get)
                .put(handlers::tasks::update)
                .delete(handlers::tasks::remove),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_basic_auth,
        ));

    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api-docs", get(handlers::api_docs))
        .route("/api/auth/register", post(handlers::auth::register))
        // Protected API
        .merge(protected)
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS from the configured origin allow-list: the verbs the API serves,
/// request headers mirrored back, credentials allowed.
fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = config::config()
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
