//! Optimistic job-board reordering
//!
//! [`JobListController`] applies a move to its held [`JobList`] at once,
//! sends the persisted-order request in the background and then keeps or
//! reverts the move depending on the [`ReorderOutcome`](shared::reorder::ReorderOutcome).

mod controller;
mod view;

pub use controller::{
    JobListController, ListState, MoveResolution, Notification, NotificationLevel, PendingMove,
    ViewSnapshot,
};
pub use view::JobList;
