//! Job-sequence reordering
//!
//! A move is planned against a snapshot read inside the store's write
//! transaction ([`plan_shift`]) and applied in that same transaction
//! ([`ReorderEngine`]), so concurrent moves are serialized by the store and
//! each one recomputes its shift range from the previous commit.

mod engine;
mod error;
mod plan;

pub use engine::ReorderEngine;
pub use error::{ReorderError, ReorderResult};
pub use plan::{OrderShift, ShiftPlan, plan_shift};
