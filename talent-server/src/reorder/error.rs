use crate::jobs::StorageError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Reorder engine errors
#[derive(Debug, Error)]
pub enum ReorderError {
    /// Mover missing, or no longer at the slot the caller saw
    #[error("Job not found: {0}")]
    NotFound(String),

    /// Target slot is outside the persisted sequence
    #[error("Reorder target slot not found: {0}")]
    SlotNotFound(i32),

    /// The shift transaction did not commit; nothing was written
    #[error("Store transaction failed: {0}")]
    StoreTransaction(#[from] StorageError),
}

impl From<ReorderError> for AppError {
    fn from(err: ReorderError) -> Self {
        match err {
            ReorderError::NotFound(msg) => AppError::with_message(ErrorCode::JobNotFound, msg),
            ReorderError::SlotNotFound(slot) => AppError::with_message(
                ErrorCode::ReorderSlotNotFound,
                format!("Reorder target slot {} not found", slot),
            )
            .with_detail("to_order", slot),
            ReorderError::StoreTransaction(e) => {
                let code = match e.error_code() {
                    ErrorCode::JobNotFound => ErrorCode::StoreTransactionFailed,
                    code => code,
                };
                AppError::with_message(code, e.to_string())
            }
        }
    }
}

pub type ReorderResult<T> = Result<T, ReorderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_job_not_found() {
        let err: AppError = ReorderError::NotFound("job-1 is no longer at slot 2".into()).into();
        assert_eq!(err.code, ErrorCode::JobNotFound);
        assert_eq!(err.http_status(), http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_slot_not_found_carries_slot() {
        let err: AppError = ReorderError::SlotNotFound(12).into();
        assert_eq!(err.code, ErrorCode::ReorderSlotNotFound);
        assert_eq!(err.details.unwrap().get("to_order").unwrap(), 12);
    }

    #[test]
    fn test_store_failure_is_system_error() {
        // A missing row discovered mid-transaction is a store failure, not a stale view
        let err: AppError =
            ReorderError::StoreTransaction(StorageError::JobNotFound("x".into())).into();
        assert_eq!(err.code, ErrorCode::StoreTransactionFailed);
        assert_eq!(
            err.http_status(),
            http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
