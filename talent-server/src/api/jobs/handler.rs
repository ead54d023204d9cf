//! Job API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult};
use shared::models::{Job, JobCreate, JobSortField, JobUpdate};
use shared::reorder::{ReorderBody, ReorderReceipt, ReorderRequest};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub sort: JobSortField,
}

/// GET /api/jobs - all jobs, ordered by `order` unless `sort` says otherwise
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Job>>> {
    let jobs = state.storage.get_all_ordered_by(query.sort)?;
    Ok(Json(jobs))
}

/// GET /api/jobs/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Job>> {
    let job = state
        .storage
        .get(&id)?
        .ok_or_else(|| AppError::job_not_found(&id))?;
    Ok(Json(job))
}

/// POST /api/jobs - append a new job
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<JobCreate>,
) -> AppResult<Json<Job>> {
    let job = state.storage.create(payload)?;
    tracing::info!(job_id = %job.id, order = job.order, "Job created");
    Ok(Json(job))
}

/// PATCH /api/jobs/{id} - edit fields; a new `order` shifts the jobs in between
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<JobUpdate>,
) -> AppResult<Json<Job>> {
    let job = state.engine.edit(&id, &payload)?;
    Ok(Json(job))
}

/// PATCH /api/jobs/{id}/reorder - move a job, shifting the jobs in between
pub async fn reorder(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<ReorderBody>,
) -> AppResult<ApiResponse<ReorderReceipt>> {
    let request = ReorderRequest::new(id, body.from_order, body.to_order);
    let receipt = state.engine.reorder(&request)?;
    Ok(ApiResponse::success(receipt))
}
