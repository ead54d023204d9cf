use thiserror::Error;

use crate::jobs::StorageError;

/// Errors that stop the server from starting or serving
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Work directory error: {0}")]
    WorkDir(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
