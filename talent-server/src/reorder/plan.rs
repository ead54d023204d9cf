use shared::models::Job;
use shared::reorder::ReorderRequest;

use super::error::{ReorderError, ReorderResult};

/// One neighbour moved by a single slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderShift {
    pub id: String,
    pub from: i32,
    pub to: i32,
}

/// Writes needed to move one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftPlan {
    pub moving_id: String,
    pub from_order: i32,
    pub to_order: i32,
    /// Neighbours between source and destination, in list order
    pub shifts: Vec<OrderShift>,
}

impl ShiftPlan {
    pub fn is_noop(&self) -> bool {
        self.from_order == self.to_order
    }

    /// Records written, mover included
    pub fn touched(&self) -> usize {
        if self.is_noop() { 0 } else { self.shifts.len() + 1 }
    }

    pub fn shifted_ids(&self) -> Vec<String> {
        self.shifts.iter().map(|s| s.id.clone()).collect()
    }

    /// `(id, new_order)` pairs for every record the move touches
    pub fn writes(&self) -> Vec<(String, i32)> {
        if self.is_noop() {
            return Vec::new();
        }
        let mut writes: Vec<(String, i32)> =
            self.shifts.iter().map(|s| (s.id.clone(), s.to)).collect();
        writes.push((self.moving_id.clone(), self.to_order));
        writes
    }
}

/// Compute the ripple shift for a move against an order snapshot
///
/// Moving down (`from < to`) pulls every record in `(from, to]` up one slot;
/// moving up (`from > to`) pushes every record in `[to, from)` down one
/// slot. Only `|to - from|` neighbours are touched.
pub fn plan_shift(snapshot: &[Job], request: &ReorderRequest) -> ReorderResult<ShiftPlan> {
    let from = request.from_order;
    let to = request.to_order;

    let mover = snapshot
        .iter()
        .find(|job| job.order == from)
        .ok_or_else(|| ReorderError::NotFound(format!("No job at slot {}", from)))?;

    if mover.id != request.moving_id {
        return Err(ReorderError::NotFound(format!(
            "Job {} is no longer at slot {}",
            request.moving_id, from
        )));
    }

    let mut plan = ShiftPlan {
        moving_id: mover.id.clone(),
        from_order: from,
        to_order: to,
        shifts: Vec::new(),
    };

    if from == to {
        return Ok(plan);
    }

    if !snapshot.iter().any(|job| job.order == to) {
        return Err(ReorderError::SlotNotFound(to));
    }

    plan.shifts = if from < to {
        snapshot
            .iter()
            .filter(|job| job.order > from && job.order <= to)
            .map(|job| OrderShift {
                id: job.id.clone(),
                from: job.order,
                to: job.order - 1,
            })
            .collect()
    } else {
        snapshot
            .iter()
            .filter(|job| job.order >= to && job.order < from)
            .map(|job| OrderShift {
                id: job.id.clone(),
                from: job.order,
                to: job.order + 1,
            })
            .collect()
    };

    Ok(plan)
}
