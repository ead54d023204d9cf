//! Shared types for TalentFlow
//!
//! Contracts used by both the mock API server and the dashboard client:
//! the job model, the reorder request/outcome types, and the unified
//! error/response structures.

pub mod error;
pub mod models;
pub mod reorder;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{Job, JobCreate, JobPatch, JobSortField, JobStatus, JobUpdate};
pub use reorder::{ReorderBody, ReorderOutcome, ReorderReceipt, ReorderRequest};
