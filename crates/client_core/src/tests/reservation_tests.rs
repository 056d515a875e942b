use super::*;

use std::{
    collections::VecDeque,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use shared::domain::MenuItem;
use tokio::sync::{Mutex, Notify};

use crate::{MissingRemoteApi, RemoteError};

#[derive(Default)]
struct CountingApi {
    calls: AtomicUsize,
    replies: Mutex<VecDeque<Result<(), RemoteError>>>,
    received: Mutex<Vec<ReservationDraft>>,
    gate: Option<Arc<Notify>>,
}

impl CountingApi {
    fn replying(replies: Vec<Result<(), RemoteError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteApi for CountingApi {
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, RemoteError> {
        Ok(Vec::new())
    }

    async fn create_reservation(&self, draft: &ReservationDraft) -> Result<(), RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().await.push(draft.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.replies.lock().await.pop_front().unwrap_or(Ok(()))
    }
}

fn rejected(detail: Option<&str>) -> Result<(), RemoteError> {
    Err(RemoteError::Status {
        status: 400,
        detail: detail.map(str::to_string),
    })
}

fn fill_required(controller: &ReservationFormController) {
    controller.set_field(DraftField::FullName, "A");
    controller.set_field(DraftField::Phone, "1");
    controller.set_field(DraftField::Date, "2024-01-01");
    controller.set_field(DraftField::Time, "18:00");
}

async fn wait_for_calls(api: &CountingApi, expected: usize) {
    while api.calls() < expected {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test]
async fn incomplete_draft_never_reaches_the_backend() {
    let api = Arc::new(CountingApi::default());
    let controller = ReservationFormController::new(api.clone());
    controller.set_field(DraftField::FullName, "A");

    let state = controller.submit().await;

    assert_eq!(state, SubmissionState::Idle);
    assert_eq!(api.calls(), 0);
    assert_eq!(
        controller.missing_fields(),
        vec![DraftField::Phone, DraftField::Date, DraftField::Time]
    );
}

#[tokio::test]
async fn success_clears_the_draft() {
    let api = Arc::new(CountingApi::default());
    let controller = ReservationFormController::new(api.clone());
    fill_required(&controller);
    controller.set_field(DraftField::Notes, "birthday");

    let state = controller.submit().await;

    assert_eq!(state, SubmissionState::Succeeded);
    assert_eq!(state.message(), Some(RESERVATION_SUCCESS));
    assert_eq!(controller.draft(), ReservationDraft::default());
    let received = api.received.lock().await;
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].full_name, "A");
    assert_eq!(received[0].notes, "birthday");
}

#[tokio::test]
async fn submitting_the_cleared_draft_after_success_stays_succeeded() {
    let api = Arc::new(CountingApi::default());
    let controller = ReservationFormController::new(api.clone());
    fill_required(&controller);
    assert_eq!(controller.submit().await, SubmissionState::Succeeded);

    assert_eq!(controller.submit().await, SubmissionState::Succeeded);
    assert_eq!(controller.status(), SubmissionState::Succeeded);
    assert_eq!(api.calls(), 1);
}

#[tokio::test]
async fn backend_detail_becomes_failure_message_and_draft_is_kept() {
    let api = Arc::new(CountingApi::replying(vec![rejected(Some("No tables"))]));
    let controller = ReservationFormController::new(api.clone());
    fill_required(&controller);
    let before = controller.draft();

    let state = controller.submit().await;

    assert_eq!(state, SubmissionState::Failed("No tables".into()));
    assert_eq!(controller.draft(), before);
}

#[tokio::test]
async fn failures_without_detail_use_generic_message() {
    let api = Arc::new(CountingApi::replying(vec![
        rejected(None),
        Err(RemoteError::Unavailable("connection refused".into())),
        Err(RemoteError::Shape("not json".into())),
    ]));
    let controller = ReservationFormController::new(api.clone());
    fill_required(&controller);

    for _ in 0..3 {
        assert_eq!(
            controller.submit().await,
            SubmissionState::Failed(RESERVATION_FAILED.into())
        );
    }
    assert_eq!(api.calls(), 3);
}

#[tokio::test]
async fn retry_after_failure_is_allowed() {
    let api = Arc::new(CountingApi::replying(vec![rejected(Some("Try later")), Ok(())]));
    let controller = ReservationFormController::new(api.clone());
    fill_required(&controller);

    assert_eq!(
        controller.submit().await,
        SubmissionState::Failed("Try later".into())
    );
    assert_eq!(controller.submit().await, SubmissionState::Succeeded);
    assert_eq!(api.calls(), 2);
}

#[tokio::test]
async fn second_submit_while_in_flight_does_not_call_backend() {
    let gate = Arc::new(Notify::new());
    let api = Arc::new(CountingApi::gated(gate.clone()));
    let controller = Arc::new(ReservationFormController::new(api.clone()));
    fill_required(&controller);

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit().await }
    });
    wait_for_calls(&api, 1).await;

    assert_eq!(controller.status(), SubmissionState::Submitting);
    assert_eq!(controller.submit().await, SubmissionState::Submitting);
    assert_eq!(api.calls(), 1);

    gate.notify_one();
    assert_eq!(first.await.expect("submit task"), SubmissionState::Succeeded);
    assert_eq!(api.calls(), 1);
}

#[tokio::test]
async fn abandoned_submit_restores_status_and_allows_retry() {
    let gate = Arc::new(Notify::new());
    let api = Arc::new(CountingApi::gated(gate.clone()));
    let controller = ReservationFormController::new(api.clone());
    fill_required(&controller);

    let abandoned = tokio::time::timeout(Duration::from_millis(50), controller.submit()).await;
    assert!(abandoned.is_err(), "gated submit must not settle");
    assert_eq!(controller.status(), SubmissionState::Idle);
    assert_eq!(controller.draft().full_name, "A");

    gate.notify_one();
    assert_eq!(controller.submit().await, SubmissionState::Succeeded);
    assert_eq!(api.calls(), 2);
}

#[tokio::test]
async fn abandoned_retry_keeps_the_earlier_failure() {
    let gate = Arc::new(Notify::new());
    let api = Arc::new(CountingApi {
        replies: Mutex::new(vec![rejected(Some("No tables"))].into()),
        ..CountingApi::gated(gate.clone())
    });
    let controller = ReservationFormController::new(api.clone());
    fill_required(&controller);

    gate.notify_one();
    assert_eq!(
        controller.submit().await,
        SubmissionState::Failed("No tables".into())
    );

    let abandoned = tokio::time::timeout(Duration::from_millis(50), controller.submit()).await;
    assert!(abandoned.is_err());
    assert_eq!(
        controller.status(),
        SubmissionState::Failed("No tables".into())
    );
}

#[tokio::test]
async fn guest_count_is_forwarded_without_range_checks() {
    let api = Arc::new(CountingApi::default());
    let controller = ReservationFormController::new(api.clone());
    fill_required(&controller);
    controller.update(|draft| draft.guests = 35);

    controller.submit().await;

    assert_eq!(api.received.lock().await[0].guests, 35);
}

#[tokio::test]
async fn reset_starts_a_new_session() {
    let api = Arc::new(CountingApi::replying(vec![rejected(Some("No tables"))]));
    let controller = ReservationFormController::new(api);
    fill_required(&controller);
    controller.submit().await;

    controller.reset();

    assert_eq!(controller.status(), SubmissionState::Idle);
    assert_eq!(controller.draft(), ReservationDraft::default());
}

#[tokio::test]
async fn teardown_discards_response_and_reset_recovers() {
    let gate = Arc::new(Notify::new());
    let api = Arc::new(CountingApi::gated(gate.clone()));
    let controller = Arc::new(ReservationFormController::new(api.clone()));
    fill_required(&controller);

    let pending = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit().await }
    });
    wait_for_calls(&api, 1).await;

    controller.teardown();
    gate.notify_one();

    assert_eq!(pending.await.expect("submit task"), SubmissionState::Submitting);
    assert_eq!(controller.draft().full_name, "A");

    controller.reset();
    assert_eq!(controller.status(), SubmissionState::Idle);

    fill_required(&controller);
    assert_eq!(controller.submit().await, SubmissionState::Idle);
    assert_eq!(api.calls(), 1);
}

#[test]
fn dropping_the_controller_cancels_its_lifecycle() {
    let form_session = CancellationToken::new();
    {
        let _form =
            ReservationFormController::with_lifecycle(Arc::new(MissingRemoteApi), form_session.clone());
        assert!(!form_session.is_cancelled());
    }
    assert!(form_session.is_cancelled());
}
