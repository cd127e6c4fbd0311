/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use kanban_api::{app::AppState, config::Config};
/// use kanban_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.database.clone()).await?;
/// let state = AppState::new(pool, config);
/// let app = kanban_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use kanban_shared::services::{ColumnService, TaskService};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. The pool and
/// both services share the same connections.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Column operations
    pub columns: ColumnService,

    /// Task operations (also the board's task store)
    pub tasks: TaskService,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            columns: ColumnService::new(db.clone()),
            tasks: TaskService::new(db.clone()),
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
/// ├── /health                          # Liveness + database check
/// └── /v1/
///     ├── /columns
///     │   ├── GET    /                 # List columns
///     │   ├── POST   /                 # Create column
///     │   ├── PUT    /reorder          # Reorder columns
///     │   ├── GET    /:id              # Get column
///     │   ├── PATCH  /:id              # Update column
///     │   ├── DELETE /:id              # Delete column and its tasks
///     │   ├── GET    /:id/tasks        # Tasks in column
///     │   └── PUT    /:id/tasks/reorder
///     ├── /tasks
///     │   ├── GET    /?status=&priority=
///     │   ├── POST   /                 # Create task from form
///     │   ├── GET    /:id
///     │   ├── PATCH  /:id
///     │   ├── DELETE /:id
///     │   └── POST   /:id/move         # Move to column + position
///     └── /board
///         ├── GET    /                 # Lanes by status
///         └── POST   /drop             # Drop a dragged task on a lane
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
pub fn build_router(state: AppState) -> Router {
    use crate::routes::{board, columns, health, tasks};

    let health_routes = Router::new().route("/health", get(health::health_check));

    let column_routes = Router::new()
        .route("/", get(columns::list_columns).post(columns::create_column))
        .route("/reorder", put(columns::reorder_columns))
        .route(
            "/:id",
            get(columns::get_column)
                .patch(columns::update_column)
                .delete(columns::delete_column),
        )
        .route("/:id/tasks", get(columns::list_column_tasks))
        .route("/:id/tasks/reorder", put(columns::reorder_column_tasks));

    let task_routes = Router::new()
        .route("/", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/:id",
            get(tasks::get_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/:id/move", post(tasks::move_task));

    let board_routes = Router::new()
        .route("/", get(board::get_board))
        .route("/drop", post(board::drop_task));

    let v1_routes = Router::new()
        .nest("/columns", column_routes)
        .nest("/tasks", task_routes)
        .nest("/board", board_routes);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config.api.cors_origins))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// CORS policy: `*` is permissive, otherwise only the listed origins
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}
