//! redb-based persisted store for job records
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `jobs` | `job_id` | `Job` (JSON) | Job records |
//!
//! # Transactions
//!
//! redb allows a single write transaction at a time; `begin_write` blocks
//! until the previous writer commits or aborts. Every multi-record write in
//! this module (bulk update, reorder shift, append) runs inside one write
//! transaction, and a transaction that is dropped without `commit()` is
//! rolled back, so readers never observe a partially applied batch.

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use shared::error::{AppError, ErrorCode};
use shared::models::{Job, JobCreate, JobPatch, JobSortField, JobStatus, JobUpdate};
use shared::util::{new_job_id, now_millis, slugify};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for storing jobs: key = job_id, value = JSON-serialized Job
const JOBS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("jobs");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Job title is required")]
    TitleRequired,

    #[error("Order {0} is out of range")]
    OrderOutOfRange(i32),
}

impl StorageError {
    /// Map to a wire error code (the dashboard localizes by code)
    pub fn error_code(&self) -> ErrorCode {
        match self {
            StorageError::JobNotFound(_) => return ErrorCode::JobNotFound,
            StorageError::Validation(_) => return ErrorCode::ValidationFailed,
            StorageError::TitleRequired => return ErrorCode::JobTitleRequired,
            StorageError::OrderOutOfRange(_) => return ErrorCode::ValueOutOfRange,
            StorageError::Serialization(_) => return ErrorCode::InternalError,
            _ => {}
        }

        // redb errors are classified by message
        let err_str = self.to_string().to_lowercase();

        if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc")
        {
            return ErrorCode::StorageFull;
        }

        if err_str.contains("corrupt") || err_str.contains("invalid database") {
            return ErrorCode::StorageCorrupted;
        }

        ErrorCode::StoreTransactionFailed
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        let code = err.error_code();
        match err {
            StorageError::JobNotFound(id) => AppError::job_not_found(id),
            other => AppError::with_message(code, other.to_string()),
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Trim a patched title and reject it if nothing is left
fn normalize_patch(patch: &JobUpdate) -> StorageResult<JobUpdate> {
    let mut patch = patch.clone();
    if let Some(title) = patch.title.take() {
        let title = title.trim();
        if title.is_empty() {
            return Err(StorageError::TitleRequired);
        }
        patch.title = Some(title.to_string());
    }
    Ok(patch)
}

/// Job storage backed by redb
#[derive(Clone)]
pub struct JobStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for JobStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobStorage").finish_non_exhaustive()
    }
}

impl JobStorage {
    /// Open or create the database at the given path
    ///
    /// redb commits with `Durability::Immediate` by default: once `commit()`
    /// returns the write is on disk, and the copy-on-write pages keep the
    /// file consistent across crashes.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests and demo mode)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(JOBS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Transaction-scoped Operations ==========

    /// Load every job sorted by `order` (within transaction)
    pub fn load_ordered(&self, txn: &WriteTransaction) -> StorageResult<Vec<Job>> {
        let table = txn.open_table(JOBS_TABLE)?;
        let mut jobs = Vec::with_capacity(table.len()? as usize);
        for result in table.iter()? {
            let (_key, value) = result?;
            let job: Job = serde_json::from_slice(value.value())?;
            jobs.push(job);
        }
        JobSortField::Order.sort(&mut jobs);
        Ok(jobs)
    }

    /// Insert or overwrite jobs (within transaction)
    pub fn put_jobs(&self, txn: &WriteTransaction, jobs: &[Job]) -> StorageResult<()> {
        let mut table = txn.open_table(JOBS_TABLE)?;
        for job in jobs {
            let value = serde_json::to_vec(job)?;
            table.insert(job.id.as_str(), value.as_slice())?;
        }
        Ok(())
    }

    /// Rewrite `order` for a set of jobs (within transaction)
    ///
    /// Every id must exist; a missing one fails the call and the caller's
    /// transaction must not be committed.
    pub fn write_orders(&self, txn: &WriteTransaction, orders: &[(String, i32)]) -> StorageResult<()> {
        let mut table = txn.open_table(JOBS_TABLE)?;
        for (id, order) in orders {
            let mut job: Job = match table.get(id.as_str())? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(StorageError::JobNotFound(id.clone())),
            };
            job.order = *order;
            let value = serde_json::to_vec(&job)?;
            table.insert(id.as_str(), value.as_slice())?;
        }
        Ok(())
    }

    /// Patch one job's fields (within transaction)
    ///
    /// `order` is ignored here; moves go through the reorder engine.
    pub fn patch_in(&self, txn: &WriteTransaction, id: &str, patch: &JobUpdate) -> StorageResult<Job> {
        let patch = JobUpdate {
            order: None,
            ..normalize_patch(patch)?
        };
        let mut table = txn.open_table(JOBS_TABLE)?;
        let mut job: Job = match table.get(id)? {
            Some(value) => serde_json::from_slice(value.value())?,
            None => return Err(StorageError::JobNotFound(id.to_string())),
        };
        job.apply(&patch);
        let value = serde_json::to_vec(&job)?;
        table.insert(id, value.as_slice())?;
        Ok(job)
    }

    // ========== Read Operations ==========

    /// Get a job by id
    pub fn get(&self, id: &str) -> StorageResult<Option<Job>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(JOBS_TABLE)?;

        match table.get(id)? {
            Some(value) => {
                let job: Job = serde_json::from_slice(value.value())?;
                Ok(Some(job))
            }
            None => Ok(None),
        }
    }

    /// Scan all jobs sorted by the given field
    pub fn get_all_ordered_by(&self, field: JobSortField) -> StorageResult<Vec<Job>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(JOBS_TABLE)?;

        let mut jobs = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let job: Job = serde_json::from_slice(value.value())?;
            jobs.push(job);
        }

        field.sort(&mut jobs);
        Ok(jobs)
    }

    /// Number of stored jobs
    pub fn count(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(JOBS_TABLE)?;
        Ok(table.len()?)
    }

    // ========== Write Operations ==========

    /// Create a job at the end of the list (`max(order) + 1`)
    pub fn create(&self, data: JobCreate) -> StorageResult<Job> {
        let title = data.title.trim().to_string();
        if title.is_empty() {
            return Err(StorageError::TitleRequired);
        }

        let txn = self.db.begin_write()?;
        let job = {
            let mut table = txn.open_table(JOBS_TABLE)?;
            let mut max_order: Option<i32> = None;
            for result in table.iter()? {
                let (_key, value) = result?;
                let existing: Job = serde_json::from_slice(value.value())?;
                max_order = Some(max_order.map_or(existing.order, |m| m.max(existing.order)));
            }

            let order = match max_order {
                None => 0,
                Some(max) => max
                    .checked_add(1)
                    .ok_or(StorageError::OrderOutOfRange(max))?,
            };

            let slug = data
                .slug
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| slugify(&title));
            let job = Job {
                id: new_job_id(),
                title,
                slug,
                status: JobStatus::Active,
                tags: data.tags,
                order,
                created_at: now_millis(),
            };

            let value = serde_json::to_vec(&job)?;
            table.insert(job.id.as_str(), value.as_slice())?;
            job
        };
        txn.commit()?;

        tracing::debug!(job_id = %job.id, order = job.order, "Job created");
        Ok(job)
    }

    /// Apply a partial update to one job
    pub fn update(&self, id: &str, patch: JobUpdate) -> StorageResult<Job> {
        let mut updated = self.transactional_bulk_update(&[JobPatch::new(id, patch)])?;
        updated
            .pop()
            .ok_or_else(|| StorageError::JobNotFound(id.to_string()))
    }

    /// Apply several patches as one all-or-nothing transaction
    ///
    /// Nothing is written if any id is missing, a title is blank, or the
    /// patched orders leave gaps or duplicates in `0..N-1`. Returns the
    /// updated records in the order of `updates`.
    pub fn transactional_bulk_update(&self, updates: &[JobPatch]) -> StorageResult<Vec<Job>> {
        let patches = updates
            .iter()
            .map(|update| normalize_patch(&update.patch))
            .collect::<StorageResult<Vec<_>>>()?;
        let touches_order = patches.iter().any(|patch| patch.order.is_some());

        let txn = self.db.begin_write()?;
        let updated = {
            let mut table = txn.open_table(JOBS_TABLE)?;

            // Later patches for the same id see earlier ones
            let mut staged: HashMap<&str, Job> = HashMap::with_capacity(updates.len());
            let mut updated = Vec::with_capacity(updates.len());
            for (update, patch) in updates.iter().zip(&patches) {
                let mut job = match staged.remove(update.id.as_str()) {
                    Some(job) => job,
                    None => match table.get(update.id.as_str())? {
                        Some(value) => serde_json::from_slice::<Job>(value.value())?,
                        None => {
                            tracing::warn!(job_id = %update.id, "Bulk update aborted: job not found");
                            return Err(StorageError::JobNotFound(update.id.clone()));
                        }
                    },
                };
                job.apply(patch);
                updated.push(job.clone());
                staged.insert(update.id.as_str(), job);
            }

            for job in staged.values() {
                let value = serde_json::to_vec(job)?;
                table.insert(job.id.as_str(), value.as_slice())?;
            }

            if touches_order {
                let mut orders = Vec::with_capacity(table.len()? as usize);
                for result in table.iter()? {
                    let (_key, value) = result?;
                    orders.push(serde_json::from_slice::<Job>(value.value())?.order);
                }
                orders.sort_unstable();
                if !orders.iter().copied().eq(0..orders.len() as i32) {
                    tracing::warn!(?orders, "Bulk update aborted: orders not dense");
                    return Err(StorageError::Validation(
                        "Job orders must stay a gap-free sequence starting at 0".into(),
                    ));
                }
            }
            updated
        };
        txn.commit()?;

        Ok(updated)
    }

    /// Populate an empty store with jobs in the given order
    ///
    /// Returns the number of jobs inserted (0 if the store already had data).
    pub fn seed_if_empty(&self, titles: &[&str]) -> StorageResult<usize> {
        let txn = self.db.begin_write()?;
        let inserted = {
            let mut table = txn.open_table(JOBS_TABLE)?;
            if table.len()? > 0 {
                return Ok(0);
            }

            let base = now_millis();
            for (idx, title) in titles.iter().enumerate() {
                let job = Job {
                    id: new_job_id(),
                    title: title.to_string(),
                    slug: slugify(title),
                    status: JobStatus::Active,
                    tags: Vec::new(),
                    order: idx as i32,
                    created_at: base + idx as i64,
                };
                let value = serde_json::to_vec(&job)?;
                table.insert(job.id.as_str(), value.as_slice())?;
            }
            titles.len()
        };
        txn.commit()?;

        tracing::info!(count = inserted, "Seeded job store");
        Ok(inserted)
    }
}
