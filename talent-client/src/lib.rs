//! TalentFlow dashboard client
//!
//! Talks to the in-process mock API through a [`JobsTransport`]. The
//! [`MockTransport`] wrapper adds simulated latency and injected failures in
//! front of the real router, and [`JobListController`] drives optimistic
//! reordering of the job board on top of it.

pub mod config;
pub mod error;
pub mod reorder;
pub mod transport;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use reorder::{
    JobList, JobListController, ListState, MoveResolution, Notification, NotificationLevel,
    PendingMove, ViewSnapshot,
};
pub use transport::{
    FaultStrategy, Injection, JobsTransport, MockTransport, NoFaults, OneshotTransport,
    Operation, RandomFaults, ScriptedFaults,
};

// Re-export shared types for convenience
pub use shared::models::{Job, JobCreate, JobUpdate};
pub use shared::reorder::{ReorderOutcome, ReorderReceipt, ReorderRequest};
