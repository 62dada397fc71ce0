use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use nextdo_core::{db::DbPool, repository::SqliteRepository};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::auth::{require_auth, TokenSigner};
use crate::config::ServerConfig;
use crate::http::{health, nextdate, signin, tasks};

/// Source of "today" for every date decision the server makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// The local calendar date at the time of the call.
    System,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }
}

/// Central shared state, passed as `Arc<AppState>` to all handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub repo: SqliteRepository,
    /// Present only when a password is configured.
    pub signer: Option<TokenSigner>,
    pub clock: Clock,
}

impl AppState {
    pub fn new(config: ServerConfig, pool: DbPool) -> Self {
        let signer = TokenSigner::from_config(&config);
        Self {
            config,
            repo: SqliteRepository::new(pool),
            signer,
            clock: Clock::System,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let task_routes = Router::new()
        .route(
            "/api/task",
            post(tasks::add_task)
                .get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/api/tasks", get(tasks::list_tasks))
        .route("/api/task/done", post(tasks::complete_task))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let mut router = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/nextdate", get(nextdate::next_date_handler))
        .route("/api/signin", post(signin::sign_in))
        .merge(task_routes);

    if let Some(dir) = state.config.static_dir() {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
