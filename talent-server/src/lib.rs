//! TalentFlow mock API server
//!
//! In-process stand-in for the hiring dashboard's backend: a redb job
//! store, the shift-based reorder engine, and the axum router that exposes
//! both. The dashboard client drives the router directly through
//! `tower::ServiceExt::oneshot`, or over TCP when run as a binary.
//!
//! ```text
//! talent-server/src/
//! ├── core/      # config, shared state, server
//! ├── jobs/      # redb job store, seed data
//! ├── reorder/   # shift planning + transactional apply
//! ├── api/       # HTTP routes and handlers
//! └── utils/     # logging
//! ```

pub mod api;
pub mod core;
pub mod jobs;
pub mod reorder;
pub mod utils;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;

pub use core::{Config, Server, ServerState};
pub use jobs::{JobStorage, StorageError};
pub use reorder::{ReorderEngine, ReorderError};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};

/// HTTP request log middleware
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    tracing::info!(target: "http_access", "{} {} {}", method, uri, response.status());

    response
}

/// Router with state and middleware attached, ready to serve or `oneshot`
pub fn build_router(state: ServerState) -> Router {
    api::build_app()
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(log_request))
}

/// Load `.env`, create the work dir and start logging
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_dir = config.log_dir();
    init_logger_with_file(
        Some(config.log_level.as_str()),
        Some(config.is_production()),
        if config.is_production() {
            log_dir.to_str()
        } else {
            None
        },
    );

    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
 _____     _            _
|_   _|_ _| | ___ _ __ | |_
  | |/ _` | |/ _ \ '_ \| __|
  | | (_| | |  __/ | | | |_
  |_|\__,_|_|\___|_| |_|\__|
    "#
    );
}
