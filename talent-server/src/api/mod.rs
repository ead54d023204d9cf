//! HTTP API
//!
//! | Route | Module |
//! |-------|--------|
//! | `/api/health` | [`health`] |
//! | `/api/jobs/...` | [`jobs`] |

pub mod health;
pub mod jobs;

use axum::Router;

use crate::core::ServerState;

/// All API routes, state not yet attached
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(jobs::router())
}
