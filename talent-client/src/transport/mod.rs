//! Transports between the dashboard and the mock API
//!
//! - [`OneshotTransport`] - calls the axum router in process
//! - [`MockTransport`] - wraps another transport with latency and failure
//!   injection driven by a [`FaultStrategy`]

mod fault;
mod mock;
mod oneshot;

use async_trait::async_trait;
use shared::models::{Job, JobCreate, JobUpdate};
use shared::reorder::{ReorderOutcome, ReorderRequest};

use crate::error::ClientResult;

pub use fault::{FaultStrategy, Injection, NoFaults, RandomFaults, ScriptedFaults};
pub use mock::MockTransport;
pub use oneshot::OneshotTransport;

/// API call kinds, as seen by a [`FaultStrategy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListJobs,
    CreateJob,
    UpdateJob,
    Reorder,
}

impl Operation {
    pub fn is_write(&self) -> bool {
        !matches!(self, Operation::ListJobs)
    }
}

/// Job API as reached from the dashboard
#[async_trait]
pub trait JobsTransport: Send + Sync + std::fmt::Debug {
    /// All jobs ordered by `order`
    async fn list_jobs(&self) -> ClientResult<Vec<Job>>;

    async fn create_job(&self, data: &JobCreate) -> ClientResult<Job>;

    async fn update_job(&self, id: &str, patch: &JobUpdate) -> ClientResult<Job>;

    /// Never errors: every failure is a [`ReorderOutcome`] variant
    async fn reorder(&self, request: &ReorderRequest) -> ReorderOutcome;
}
