use parking_lot::Mutex;
use shared::reorder::{ReorderOutcome, ReorderReceipt, ReorderRequest};
use std::sync::{Arc, Weak};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use super::view::JobList;
use crate::error::{ClientError, ClientResult};
use crate::transport::JobsTransport;

const NOTIFICATION_CAPACITY: usize = 64;

/// Controller state
///
/// `Stable` holds a view that matches the last known persisted order.
/// `Pending` holds the optimistic view shown while `in_flight` moves are
/// unresolved, plus the last confirmed view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Stable(JobList),
    Pending {
        optimistic: JobList,
        baseline: JobList,
        in_flight: usize,
    },
}

impl ListState {
    /// The list currently shown
    pub fn view(&self) -> &JobList {
        match self {
            ListState::Stable(view) => view,
            ListState::Pending { optimistic, .. } => optimistic,
        }
    }

    /// Last confirmed list
    pub fn baseline(&self) -> &JobList {
        match self {
            ListState::Stable(view) => view,
            ListState::Pending { baseline, .. } => baseline,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ListState::Pending { .. })
    }
}

impl Default for ListState {
    fn default() -> Self {
        ListState::Stable(JobList::default())
    }
}

/// What subscribers render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub jobs: JobList,
    /// A move is in flight
    pub reordering: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// User-visible toast, one per resolved move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// How a move ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResolution {
    /// Persisted; the optimistic view stays
    Confirmed(ReorderReceipt),
    /// Rejected or lost; the view went back to what it was before the move
    RolledBack(ReorderOutcome),
    /// Dropped onto its own position, nothing sent
    Unchanged,
    /// The controller was dropped before the response arrived
    Abandoned,
}

/// Handle to a move whose request is in flight
#[derive(Debug)]
pub struct PendingMove {
    inner: PendingInner,
}

#[derive(Debug)]
enum PendingInner {
    Ready(MoveResolution),
    Spawned(JoinHandle<MoveResolution>),
}

impl PendingMove {
    /// Wait for the transport to answer and the view to settle
    pub async fn resolved(self) -> MoveResolution {
        match self.inner {
            PendingInner::Ready(resolution) => resolution,
            PendingInner::Spawned(handle) => handle.await.unwrap_or_else(|e| {
                tracing::error!(error = %e, "Reorder task failed");
                MoveResolution::Abandoned
            }),
        }
    }

    pub fn is_finished(&self) -> bool {
        match &self.inner {
            PendingInner::Ready(_) => true,
            PendingInner::Spawned(handle) => handle.is_finished(),
        }
    }
}

/// Per-move bookkeeping carried into the background task
#[derive(Debug)]
struct MoveTicket {
    request: ReorderRequest,
    /// View before this move
    rollback_to: JobList,
    /// View right after this move
    committed: JobList,
    epoch: u64,
}

#[derive(Debug)]
struct Shared {
    state: ListState,
    /// Bumped by `load()` so moves started before a reload do not touch the
    /// reloaded view
    epoch: u64,
}

#[derive(Debug)]
struct Inner {
    transport: Arc<dyn JobsTransport>,
    shared: Mutex<Shared>,
    view_tx: watch::Sender<ViewSnapshot>,
    notify_tx: broadcast::Sender<Notification>,
}

impl Inner {
    fn publish(&self, state: &ListState) {
        self.view_tx.send_replace(ViewSnapshot {
            jobs: state.view().clone(),
            reordering: state.is_pending(),
        });
    }

    fn notify(&self, notification: Notification) {
        // No subscribers is fine
        let _ = self.notify_tx.send(notification);
    }

    /// Apply a transport answer to the state; called once per move
    fn resolve(&self, ticket: MoveTicket, outcome: ReorderOutcome) -> MoveResolution {
        {
            let mut shared = self.shared.lock();
            if ticket.epoch == shared.epoch {
                let next = match std::mem::take(&mut shared.state) {
                    ListState::Pending {
                        optimistic,
                        baseline,
                        in_flight,
                    } => {
                        let (optimistic, baseline) = if outcome.is_success() {
                            (optimistic, ticket.committed)
                        } else {
                            (ticket.rollback_to, baseline)
                        };
                        if in_flight > 1 {
                            ListState::Pending {
                                optimistic,
                                baseline,
                                in_flight: in_flight - 1,
                            }
                        } else {
                            ListState::Stable(optimistic)
                        }
                    }
                    stable @ ListState::Stable(_) => stable,
                };
                shared.state = next;
                self.publish(&shared.state);
            } else {
                tracing::debug!(moving_id = %ticket.request.moving_id, "Move resolved after reload, view kept");
            }
        }

        match outcome {
            ReorderOutcome::Success(receipt) => {
                tracing::info!(
                    moving_id = %receipt.moving_id,
                    from_order = receipt.from_order,
                    to_order = receipt.to_order,
                    "Reorder confirmed"
                );
                self.notify(Notification::success("Job order updated"));
                MoveResolution::Confirmed(receipt)
            }
            failure => {
                tracing::warn!(
                    moving_id = %ticket.request.moving_id,
                    outcome = ?failure,
                    "Reorder failed, rolling back"
                );
                self.notify(Notification::error(format!(
                    "Could not reorder job: {}",
                    failure.message()
                )));
                MoveResolution::RolledBack(failure)
            }
        }
    }
}

/// Optimistic controller for the job board
///
/// Cheap to clone; clones share state. Dropping the last clone abandons any
/// move still in flight: its request still completes, but nothing is
/// rendered or notified for it.
#[derive(Debug, Clone)]
pub struct JobListController {
    inner: Arc<Inner>,
}

impl JobListController {
    pub fn new(transport: Arc<dyn JobsTransport>) -> Self {
        let (view_tx, _) = watch::channel(ViewSnapshot::default());
        let (notify_tx, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                transport,
                shared: Mutex::new(Shared {
                    state: ListState::default(),
                    epoch: 0,
                }),
                view_tx,
                notify_tx,
            }),
        }
    }

    /// Fetch persisted order and start over from it
    pub async fn load(&self) -> ClientResult<JobList> {
        let jobs = self.inner.transport.list_jobs().await?;
        let list = JobList::new(jobs);

        let mut shared = self.inner.shared.lock();
        shared.epoch += 1;
        shared.state = ListState::Stable(list.clone());
        self.inner.publish(&shared.state);
        tracing::debug!(jobs = list.len(), "Job board loaded");

        Ok(list)
    }

    /// Same as [`load`](Self::load); moves still in flight stop affecting the view
    pub async fn reload(&self) -> ClientResult<JobList> {
        self.load().await
    }

    pub fn view(&self) -> JobList {
        self.inner.shared.lock().state.view().clone()
    }

    pub fn state(&self) -> ListState {
        self.inner.shared.lock().state.clone()
    }

    pub fn is_reordering(&self) -> bool {
        self.inner.shared.lock().state.is_pending()
    }

    pub fn subscribe_view(&self) -> watch::Receiver<ViewSnapshot> {
        self.inner.view_tx.subscribe()
    }

    pub fn subscribe_notifications(&self) -> broadcast::Receiver<Notification> {
        self.inner.notify_tx.subscribe()
    }

    /// Move `id` to `new_index` in the shown list
    ///
    /// The view changes before this returns; the request is sent from a
    /// spawned task. Never blocks on earlier moves. Must be called inside a
    /// tokio runtime.
    pub fn begin_move(&self, id: &str, new_index: usize) -> ClientResult<PendingMove> {
        let ticket = {
            let mut shared = self.inner.shared.lock();
            let current = shared.state.view().clone();

            let Some((moved, request)) = current.moved(id, new_index) else {
                return Err(ClientError::NotFound(format!("Job {} is not on the board", id)));
            };

            if request.is_noop() {
                return Ok(PendingMove {
                    inner: PendingInner::Ready(MoveResolution::Unchanged),
                });
            }

            shared.state = match std::mem::take(&mut shared.state) {
                ListState::Stable(view) => ListState::Pending {
                    optimistic: moved.clone(),
                    baseline: view,
                    in_flight: 1,
                },
                ListState::Pending {
                    baseline,
                    in_flight,
                    ..
                } => ListState::Pending {
                    optimistic: moved.clone(),
                    baseline,
                    in_flight: in_flight + 1,
                },
            };
            self.inner.publish(&shared.state);

            MoveTicket {
                request,
                rollback_to: current,
                committed: moved,
                epoch: shared.epoch,
            }
        };

        tracing::debug!(
            moving_id = %ticket.request.moving_id,
            from_order = ticket.request.from_order,
            to_order = ticket.request.to_order,
            "Optimistic move applied"
        );

        let transport = Arc::clone(&self.inner.transport);
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            let outcome = transport.reorder(&ticket.request).await;
            match weak.upgrade() {
                Some(inner) => inner.resolve(ticket, outcome),
                None => {
                    tracing::debug!(moving_id = %ticket.request.moving_id, "Controller gone, move abandoned");
                    MoveResolution::Abandoned
                }
            }
        });

        Ok(PendingMove {
            inner: PendingInner::Spawned(handle),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{Injection, MockTransport, ScriptedFaults};
    use async_trait::async_trait;
    use shared::models::{Job, JobCreate, JobUpdate};
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Serves a fixed list and answers reorders from a script
    #[derive(Debug)]
    struct ScriptedApi {
        jobs: Vec<Job>,
        answers: Mutex<VecDeque<&'static str>>,
    }

    impl ScriptedApi {
        fn new(ids: &[&str], answers: &[&'static str]) -> Self {
            let jobs = ids
                .iter()
                .enumerate()
                .map(|(idx, id)| Job {
                    id: id.to_string(),
                    title: id.to_string(),
                    slug: id.to_lowercase(),
                    status: Default::default(),
                    tags: vec![],
                    order: idx as i32,
                    created_at: 0,
                })
                .collect();
            Self {
                jobs,
                answers: Mutex::new(answers.iter().copied().collect()),
            }
        }
    }

    #[async_trait]
    impl JobsTransport for ScriptedApi {
        async fn list_jobs(&self) -> ClientResult<Vec<Job>> {
            Ok(self.jobs.clone())
        }

        async fn create_job(&self, _data: &JobCreate) -> ClientResult<Job> {
            Err(ClientError::Internal("unused".into()))
        }

        async fn update_job(&self, _id: &str, _patch: &JobUpdate) -> ClientResult<Job> {
            Err(ClientError::Internal("unused".into()))
        }

        async fn reorder(&self, request: &ReorderRequest) -> ReorderOutcome {
            match self.answers.lock().pop_front().unwrap_or("ok") {
                "not_found" => ReorderOutcome::NotFound("stale".into()),
                "store" => ReorderOutcome::StoreTransactionFailure("aborted".into()),
                _ => ReorderOutcome::Success(ReorderReceipt::new(request, vec![])),
            }
        }
    }

    async fn controller(
        ids: &[&str],
        answers: &[&'static str],
        script: Vec<Injection>,
    ) -> JobListController {
        let transport = MockTransport::new(
            ScriptedApi::new(ids, answers),
            Arc::new(ScriptedFaults::new(script)),
        );
        let controller = JobListController::new(Arc::new(transport));
        controller.load().await.unwrap();
        controller
    }

    #[tokio::test(start_paused = true)]
    async fn test_rollback_on_transport_failure() {
        let controller = controller(&["A", "B", "C", "D"], &[], vec![Injection::fail_after(200)]).await;
        let mut notes = controller.subscribe_notifications();

        let pending = controller.begin_move("C", 0).unwrap();
        assert_eq!(controller.view().ids(), vec!["C", "A", "B", "D"]);
        assert!(controller.is_reordering());

        let resolution = pending.resolved().await;
        assert!(matches!(
            resolution,
            MoveResolution::RolledBack(ReorderOutcome::TransportFailure(_))
        ));
        assert_eq!(controller.view().ids(), vec!["A", "B", "C", "D"]);
        assert_eq!(controller.state(), ListState::Stable(controller.view()));

        let note = notes.recv().await.unwrap();
        assert_eq!(note.level, NotificationLevel::Error);
        assert!(notes.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_keeps_optimistic_view() {
        let controller = controller(&["A", "B", "C", "D", "E"], &[], vec![Injection::delay(100)]).await;
        let mut notes = controller.subscribe_notifications();

        let pending = controller.begin_move("B", 3).unwrap();
        let resolution = pending.resolved().await;

        let MoveResolution::Confirmed(receipt) = resolution else {
            panic!("expected confirmation, got {:?}", resolution);
        };
        assert_eq!((receipt.from_order, receipt.to_order), (1, 3));
        assert_eq!(controller.view().ids(), vec!["A", "C", "D", "B", "E"]);
        assert!(!controller.is_reordering());
        assert_eq!(notes.recv().await.unwrap().level, NotificationLevel::Success);
        assert!(notes.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_failure_kind_rolls_back() {
        let controller = controller(&["A", "B", "C"], &["not_found", "store"], vec![]).await;

        let first = controller.begin_move("A", 2).unwrap().resolved().await;
        assert!(matches!(first, MoveResolution::RolledBack(ReorderOutcome::NotFound(_))));
        assert_eq!(controller.view().ids(), vec!["A", "B", "C"]);

        let second = controller.begin_move("C", 0).unwrap().resolved().await;
        assert!(matches!(
            second,
            MoveResolution::RolledBack(ReorderOutcome::StoreTransactionFailure(_))
        ));
        assert_eq!(controller.view().ids(), vec!["A", "B", "C"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_channel_tracks_reordering_flag() {
        let controller = controller(&["A", "B", "C"], &[], vec![Injection::delay(50)]).await;
        let rx = controller.subscribe_view();

        let pending = controller.begin_move("C", 0).unwrap();
        {
            let snapshot = rx.borrow();
            assert!(snapshot.reordering);
            assert_eq!(snapshot.jobs.ids(), vec!["C", "A", "B"]);
        }

        pending.resolved().await;
        let snapshot = rx.borrow();
        assert!(!snapshot.reordering);
        assert_eq!(snapshot.jobs.ids(), vec!["C", "A", "B"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_move_while_first_in_flight() {
        let controller = controller(
            &["A", "B", "C", "D"],
            &[],
            vec![Injection::fail_after(100), Injection::delay(10)],
        )
        .await;
        let mut notes = controller.subscribe_notifications();

        let first = controller.begin_move("A", 3).unwrap();
        // Operates on the optimistic view [B, C, D, A]
        let second = controller.begin_move("D", 0).unwrap();
        assert_eq!(controller.view().ids(), vec!["D", "B", "C", "A"]);
        match controller.state() {
            ListState::Pending { in_flight, baseline, .. } => {
                assert_eq!(in_flight, 2);
                assert_eq!(baseline.ids(), vec!["A", "B", "C", "D"]);
            }
            other => panic!("expected pending, got {:?}", other),
        }

        assert!(matches!(second.resolved().await, MoveResolution::Confirmed(_)));
        assert!(controller.is_reordering());

        // Last response wins: the failed first move restores its own snapshot
        assert!(matches!(first.resolved().await, MoveResolution::RolledBack(_)));
        assert_eq!(controller.view().ids(), vec!["A", "B", "C", "D"]);
        assert!(!controller.is_reordering());

        let levels: Vec<_> = [notes.recv().await.unwrap(), notes.recv().await.unwrap()]
            .iter()
            .map(|n| n.level)
            .collect();
        assert_eq!(levels, vec![NotificationLevel::Success, NotificationLevel::Error]);
        assert!(notes.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_noop_and_unknown_moves() {
        let controller = controller(&["A", "B"], &[], vec![]).await;
        let mut notes = controller.subscribe_notifications();

        let resolution = controller.begin_move("B", 1).unwrap().resolved().await;
        assert_eq!(resolution, MoveResolution::Unchanged);
        assert!(!controller.is_reordering());
        assert!(notes.try_recv().is_err());

        assert!(matches!(
            controller.begin_move("Z", 0),
            Err(ClientError::NotFound(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_controller_abandons_move() {
        let controller = controller(&["A", "B"], &[], vec![Injection::delay(500)]).await;
        let rx = controller.subscribe_view();

        let pending = controller.begin_move("B", 0).unwrap();
        drop(controller);

        assert_eq!(pending.resolved().await, MoveResolution::Abandoned);
        // Last published view is the optimistic one; nothing rendered after the drop
        assert!(rx.borrow().reordering);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_detaches_in_flight_moves() {
        let controller = controller(&["A", "B", "C"], &[], vec![Injection::fail_after(300)]).await;
        let mut notes = controller.subscribe_notifications();

        let pending = controller.begin_move("C", 0).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        controller.reload().await.unwrap();
        assert!(!controller.is_reordering());

        assert!(matches!(pending.resolved().await, MoveResolution::RolledBack(_)));
        assert_eq!(controller.view().ids(), vec!["A", "B", "C"]);
        assert!(!controller.is_reordering());
        // Still told about the failure
        assert_eq!(notes.recv().await.unwrap().level, NotificationLevel::Error);
    }
}
