//! Job API
//!
//! | Route | Method | Handler |
//! |-------|--------|---------|
//! | `/api/jobs` | GET | list, `?sort=order\|created_at\|title` |
//! | `/api/jobs` | POST | create (appends to the end) |
//! | `/api/jobs/{id}` | GET | get by id |
//! | `/api/jobs/{id}` | PATCH | administrative edit |
//! | `/api/jobs/{id}/reorder` | PATCH | shift-based move |

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/jobs", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).patch(handler::update))
        .route("/{id}/reorder", patch(handler::reorder))
}
