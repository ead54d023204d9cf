//! Optimistic controller against the real router and store
//!
//! Run: cargo test -p talent-server --test optimistic_flow

use std::sync::Arc;

use shared::models::JobSortField;
use shared::reorder::{ReorderOutcome, ReorderRequest};
use talent_client::{
    Injection, JobListController, MockTransport, MoveResolution, NotificationLevel,
    OneshotTransport, ScriptedFaults,
};
use talent_server::{Config, ServerState, build_router};

struct Harness {
    state: ServerState,
    faults: Arc<ScriptedFaults>,
    controller: JobListController,
}

impl Harness {
    async fn new(titles: &[&str]) -> Self {
        let state =
            ServerState::in_memory(Config::with_overrides("/tmp/talent-flow", 0)).unwrap();
        state.storage.seed_if_empty(titles).unwrap();

        let faults = Arc::new(ScriptedFaults::default());
        let transport = MockTransport::new(
            OneshotTransport::new(build_router(state.clone())),
            faults.clone(),
        );
        let controller = JobListController::new(Arc::new(transport));
        controller.load().await.unwrap();

        Self {
            state,
            faults,
            controller,
        }
    }

    fn id(&self, title: &str) -> String {
        self.controller
            .view()
            .jobs()
            .iter()
            .find(|job| job.title == title)
            .unwrap()
            .id
            .clone()
    }

    fn view_titles(&self) -> Vec<String> {
        self.controller
            .view()
            .titles()
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn persisted_titles(&self) -> Vec<String> {
        self.state
            .storage
            .get_all_ordered_by(JobSortField::Order)
            .unwrap()
            .into_iter()
            .map(|job| job.title)
            .collect()
    }
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_restores_view_and_store() {
    let h = Harness::new(&["A", "B", "C", "D"]).await;
    h.faults.push(Injection::fail_after(250));
    let mut notes = h.controller.subscribe_notifications();

    let pending = h.controller.begin_move(&h.id("C"), 0).unwrap();
    assert_eq!(h.view_titles(), vec!["C", "A", "B", "D"]);
    assert!(h.controller.subscribe_view().borrow().reordering);

    let resolution = pending.resolved().await;

    assert!(matches!(
        resolution,
        MoveResolution::RolledBack(ReorderOutcome::TransportFailure(_))
    ));
    assert_eq!(h.view_titles(), vec!["A", "B", "C", "D"]);
    assert_eq!(h.persisted_titles(), vec!["A", "B", "C", "D"]);
    assert_eq!(notes.recv().await.unwrap().level, NotificationLevel::Error);
    assert!(notes.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_confirmed_move_matches_store() {
    let h = Harness::new(&["A", "B", "C", "D", "E"]).await;
    h.faults.push(Injection::delay(400));
    let mut notes = h.controller.subscribe_notifications();

    let resolution = h.controller.begin_move(&h.id("D"), 1).unwrap().resolved().await;

    let MoveResolution::Confirmed(receipt) = resolution else {
        panic!("expected confirmation, got {:?}", resolution);
    };
    assert_eq!(receipt.shifted, vec![h.id("B"), h.id("C")]);
    assert_eq!(h.view_titles(), vec!["A", "D", "B", "C", "E"]);
    assert_eq!(h.persisted_titles(), h.view_titles());

    // Optimistic orders equal what the store persisted
    let persisted = h.state.storage.get_all_ordered_by(JobSortField::Order).unwrap();
    assert_eq!(h.controller.view().jobs(), persisted.as_slice());
    assert_eq!(notes.recv().await.unwrap().level, NotificationLevel::Success);
}

#[tokio::test(start_paused = true)]
async fn test_stale_view_rolls_back_then_reload_recovers() {
    let h = Harness::new(&["A", "B", "C"]).await;

    // Someone else moves A behind the dashboard's back
    h.state
        .engine
        .reorder(&ReorderRequest::new(h.id("A"), 0, 2))
        .unwrap();

    let resolution = h.controller.begin_move(&h.id("A"), 1).unwrap().resolved().await;

    assert!(matches!(
        resolution,
        MoveResolution::RolledBack(ReorderOutcome::NotFound(_))
    ));
    assert_eq!(h.view_titles(), vec!["A", "B", "C"]);

    h.controller.reload().await.unwrap();
    assert_eq!(h.view_titles(), vec!["B", "C", "A"]);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_moves_commit_in_response_order() {
    let h = Harness::new(&["A", "B", "C", "D", "E"]).await;
    h.faults.push(Injection::delay(50));
    h.faults.push(Injection::delay(0));
    let mut notes = h.controller.subscribe_notifications();

    let first = h.controller.begin_move(&h.id("A"), 2).unwrap();
    // Planned on the optimistic [B, C, A, D, E]
    let second = h.controller.begin_move(&h.id("E"), 1).unwrap();
    assert_eq!(h.view_titles(), vec!["B", "E", "C", "A", "D"]);

    assert!(matches!(second.resolved().await, MoveResolution::Confirmed(_)));
    assert!(h.controller.is_reordering());
    assert!(matches!(first.resolved().await, MoveResolution::Confirmed(_)));
    assert!(!h.controller.is_reordering());

    // The store applied E 4->1 before A 0->2
    assert_eq!(h.persisted_titles(), vec!["E", "B", "A", "C", "D"]);

    h.controller.reload().await.unwrap();
    assert_eq!(h.view_titles(), h.persisted_titles());

    let first_note = notes.recv().await.unwrap();
    let second_note = notes.recv().await.unwrap();
    assert_eq!(first_note.level, NotificationLevel::Success);
    assert_eq!(second_note.level, NotificationLevel::Success);
    assert!(notes.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_archived_job_can_be_moved() {
    let h = Harness::new(&["A", "B", "C"]).await;
    h.state
        .storage
        .update(
            &h.id("B"),
            shared::models::JobUpdate {
                status: Some(shared::models::JobStatus::Archived),
                ..Default::default()
            },
        )
        .unwrap();
    h.controller.reload().await.unwrap();

    let resolution = h.controller.begin_move(&h.id("B"), 0).unwrap().resolved().await;

    assert!(matches!(resolution, MoveResolution::Confirmed(_)));
    assert_eq!(h.persisted_titles(), vec!["B", "A", "C"]);
}
