/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskboard_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = taskboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET    /health
/// ├── GET|POST|PUT|DELETE /tasks          # PUT/DELETE take the id in the body
/// ├── GET    /tasks/:id/history
/// ├── POST   /move-task
/// ├── GET|POST /columns   PUT|DELETE /columns/:id
/// ├── GET|POST /boards    PUT|DELETE /boards/:id
/// ├── GET|POST /workspaces  PUT|DELETE /workspaces/:id
/// ├── GET|POST /organizations  PUT|DELETE /organizations/:id
/// ├── GET    /organizations/:id/workspaces
/// └── GET|POST /users     PUT|DELETE /users/:id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes::{boards, columns, health, organizations, tasks, users, workspaces};

    let task_routes = Router::new()
        .route(
            "/tasks",
            get(tasks::list_tasks)
                .post(tasks::create_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/tasks/:id/history", get(tasks::list_task_history))
        .route("/move-task", post(tasks::move_task));

    let column_routes = Router::new()
        .route("/columns", get(columns::list_columns).post(columns::create_column))
        .route(
            "/columns/:id",
            put(columns::update_column).delete(columns::delete_column),
        );

    let board_routes = Router::new()
        .route("/boards", get(boards::list_boards).post(boards::create_board))
        .route("/boards/:id", put(boards::update_board).delete(boards::delete_board));

    let workspace_routes = Router::new()
        .route(
            "/workspaces",
            get(workspaces::list_workspaces).post(workspaces::create_workspace),
        )
        .route(
            "/workspaces/:id",
            put(workspaces::update_workspace).delete(workspaces::delete_workspace),
        );

    let organization_routes = Router::new()
        .route(
            "/organizations",
            get(organizations::list_organizations).post(organizations::create_organization),
        )
        .route(
            "/organizations/:id",
            put(organizations::update_organization).delete(organizations::delete_organization),
        )
        .route(
            "/organizations/:id/workspaces",
            get(organizations::list_organization_workspaces),
        );

    let user_routes = Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/:id", put(users::update_user).delete(users::delete_user));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(task_routes)
        .merge(column_routes)
        .merge(board_routes)
        .merge(workspace_routes)
        .merge(organization_routes)
        .merge(user_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

/// CORS for the board front-end
fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_permissive() {
        // Development mode: permissive CORS
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}
