//! Job persistence
//!
//! - [`storage`] - redb-backed store with transactional bulk updates
//! - [`seed`] - demo data for a fresh store

pub mod seed;
pub mod storage;

pub use seed::DEFAULT_JOB_TITLES;
pub use storage::{JobStorage, StorageError, StorageResult};
