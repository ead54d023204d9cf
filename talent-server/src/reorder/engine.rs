use shared::models::{Job, JobUpdate};
use shared::reorder::{ReorderReceipt, ReorderRequest};

use super::error::{ReorderError, ReorderResult};
use super::plan::plan_shift;
use crate::jobs::{JobStorage, StorageError};

/// Applies job moves as single redb write transactions
///
/// The snapshot is read inside the write transaction, so two moves racing
/// for the store are applied one after the other and the later one plans
/// against the earlier one's committed orders.
#[derive(Debug, Clone)]
pub struct ReorderEngine {
    storage: JobStorage,
}

impl ReorderEngine {
    pub fn new(storage: JobStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &JobStorage {
        &self.storage
    }

    /// Move `request.moving_id` from `from_order` to `to_order`
    ///
    /// Any error leaves the store untouched: the transaction is dropped
    /// before `commit()`.
    pub fn reorder(&self, request: &ReorderRequest) -> ReorderResult<ReorderReceipt> {
        let txn = self.storage.begin_write()?;
        let snapshot = self.storage.load_ordered(&txn)?;

        let plan = match plan_shift(&snapshot, request) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!(
                    moving_id = %request.moving_id,
                    from_order = request.from_order,
                    to_order = request.to_order,
                    error = %e,
                    "Reorder rejected"
                );
                return Err(e);
            }
        };

        if plan.is_noop() {
            tracing::debug!(moving_id = %request.moving_id, order = request.from_order, "Reorder no-op");
            return Ok(ReorderReceipt::new(request, Vec::new()));
        }

        self.storage.write_orders(&txn, &plan.writes())?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(
            moving_id = %request.moving_id,
            from_order = request.from_order,
            to_order = request.to_order,
            touched = plan.touched(),
            "Job reordered"
        );

        Ok(ReorderReceipt::new(request, plan.shifted_ids()))
    }

    /// Edit a job's fields in one transaction
    ///
    /// An `order` in the patch is a move from the job's current slot and
    /// shifts the jobs in between like [`reorder`](Self::reorder). A target
    /// outside `0..N-1` is `OrderOutOfRange`.
    pub fn edit(&self, id: &str, patch: &JobUpdate) -> ReorderResult<Job> {
        let txn = self.storage.begin_write()?;
        let snapshot = self.storage.load_ordered(&txn)?;
        let current = snapshot
            .iter()
            .find(|job| job.id == id)
            .map(|job| job.order)
            .ok_or_else(|| ReorderError::NotFound(format!("Job {} does not exist", id)))?;

        let mut touched = 0;
        if let Some(to_order) = patch.order {
            let request = ReorderRequest::new(id, current, to_order);
            let plan = plan_shift(&snapshot, &request).map_err(|e| match e {
                ReorderError::SlotNotFound(slot) => StorageError::OrderOutOfRange(slot).into(),
                other => other,
            })?;
            if !plan.is_noop() {
                self.storage.write_orders(&txn, &plan.writes())?;
                touched = plan.touched();
            }
        }

        let job = self.storage.patch_in(&txn, id, patch)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(job_id = %id, order = job.order, touched, "Job edited");
        Ok(job)
    }
}
