//! Reorder protocol types
//!
//! The request carried from the dashboard to the mock API, the receipt the
//! engine returns, and the tagged outcome the client branches on.

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// Move one job from slot `from_order` to slot `to_order`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub moving_id: String,
    /// Persisted order of the mover as seen by the caller
    pub from_order: i32,
    /// Target slot in the same integer space
    pub to_order: i32,
}

impl ReorderRequest {
    pub fn new(moving_id: impl Into<String>, from_order: i32, to_order: i32) -> Self {
        Self {
            moving_id: moving_id.into(),
            from_order,
            to_order,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.from_order == self.to_order
    }

    /// HTTP body for `PATCH /api/jobs/{id}/reorder`
    pub fn body(&self) -> ReorderBody {
        ReorderBody {
            from_order: self.from_order,
            to_order: self.to_order,
        }
    }
}

/// Body of `PATCH /api/jobs/{id}/reorder`; the mover id travels in the path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderBody {
    pub from_order: i32,
    pub to_order: i32,
}

/// Result of a committed reorder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderReceipt {
    pub success: bool,
    pub moving_id: String,
    pub from_order: i32,
    pub to_order: i32,
    /// Ids of the records shifted by one slot, mover excluded
    #[serde(default)]
    pub shifted: Vec<String>,
}

impl ReorderReceipt {
    pub fn new(request: &ReorderRequest, shifted: Vec<String>) -> Self {
        Self {
            success: true,
            moving_id: request.moving_id.clone(),
            from_order: request.from_order,
            to_order: request.to_order,
            shifted,
        }
    }

    /// Number of records written, mover included
    pub fn touched(&self) -> usize {
        if self.from_order == self.to_order {
            0
        } else {
            self.shifted.len() + 1
        }
    }
}

/// Tagged result of a reorder round-trip
///
/// Every non-success variant means nothing was persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ReorderOutcome {
    Success(ReorderReceipt),
    /// Mover not at `from_order` any more, or the target slot does not exist
    NotFound(String),
    /// Simulated network/server outage; the request never reached the store
    TransportFailure(String),
    /// The atomic write was rejected by the store
    StoreTransactionFailure(String),
}

impl ReorderOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn receipt(&self) -> Option<&ReorderReceipt> {
        match self {
            Self::Success(receipt) => Some(receipt),
            _ => None,
        }
    }

    /// Human-readable reason for a rejected move
    pub fn message(&self) -> &str {
        match self {
            Self::Success(_) => "Job order updated",
            Self::NotFound(msg) | Self::TransportFailure(msg) | Self::StoreTransactionFailure(msg) => {
                msg
            }
        }
    }

    /// Classify an API error response
    ///
    /// Not-found codes mean a stale view; transport-class system codes mean
    /// the request was dropped; everything else was rejected by the store.
    pub fn from_error_code(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            ErrorCode::NotFound | ErrorCode::JobNotFound | ErrorCode::ReorderSlotNotFound => {
                Self::NotFound(message)
            }
            ErrorCode::NetworkError | ErrorCode::TimeoutError => Self::TransportFailure(message),
            _ => Self::StoreTransactionFailure(message),
        }
    }
}
