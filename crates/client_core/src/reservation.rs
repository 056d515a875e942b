use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::domain::{DraftField, ReservationDraft};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::RemoteApi;

pub use crate::error::RESERVATION_FAILED;

pub const RESERVATION_SUCCESS: &str = "Reservasi berhasil!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

impl SubmissionState {
    /// Status line shown next to the submit button.
    pub fn message(&self) -> Option<&str> {
        match self {
            SubmissionState::Idle => None,
            SubmissionState::Submitting => Some("Mengirim..."),
            SubmissionState::Succeeded => Some(RESERVATION_SUCCESS),
            SubmissionState::Failed(message) => Some(message),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionState::Succeeded | SubmissionState::Failed(_))
    }
}

struct FormSession {
    draft: ReservationDraft,
    status: SubmissionState,
}

/// Restores the pre-submit status if a `submit()` future is dropped before it settles.
struct InFlight<'a> {
    session: &'a Mutex<FormSession>,
    previous: Option<SubmissionState>,
}

impl InFlight<'_> {
    fn settle(mut self) {
        self.previous = None;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let Some(previous) = self.previous.take() else {
            return;
        };
        let mut session = lock(self.session);
        if session.status == SubmissionState::Submitting {
            debug!("reservation: submit abandoned, restoring previous status");
            session.status = previous;
        }
    }
}

fn lock(session: &Mutex<FormSession>) -> MutexGuard<'_, FormSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns one reservation draft and posts it, at most one request at a time.
///
/// Dropping the controller cancels its lifecycle token.
pub struct ReservationFormController {
    api: Arc<dyn RemoteApi>,
    lifecycle: CancellationToken,
    session: Mutex<FormSession>,
}

impl ReservationFormController {
    pub fn new(api: Arc<dyn RemoteApi>) -> Self {
        Self::with_lifecycle(api, CancellationToken::new())
    }

    pub fn with_lifecycle(api: Arc<dyn RemoteApi>, lifecycle: CancellationToken) -> Self {
        Self {
            api,
            lifecycle,
            session: Mutex::new(FormSession {
                draft: ReservationDraft::default(),
                status: SubmissionState::Idle,
            }),
        }
    }

    pub fn draft(&self) -> ReservationDraft {
        lock(&self.session).draft.clone()
    }

    pub fn status(&self) -> SubmissionState {
        lock(&self.session).status.clone()
    }

    pub fn set_field(&self, field: DraftField, value: &str) {
        lock(&self.session).draft.set_field(field, value);
    }

    pub fn update(&self, edit: impl FnOnce(&mut ReservationDraft)) {
        edit(&mut lock(&self.session).draft);
    }

    pub fn missing_fields(&self) -> Vec<DraftField> {
        lock(&self.session).draft.missing_fields()
    }

    /// Posts the current draft.
    ///
    /// Ignored while a request is in flight, after teardown, or while required fields are
    /// empty; those cases return the unchanged state. On success the draft is cleared, on
    /// failure it is kept.
    pub async fn submit(&self) -> SubmissionState {
        let (draft, in_flight) = {
            let mut session = lock(&self.session);
            if self.lifecycle.is_cancelled() {
                debug!("reservation: submit ignored, form torn down");
                return session.status.clone();
            }
            if session.status == SubmissionState::Submitting {
                debug!("reservation: submit ignored, request already in flight");
                return session.status.clone();
            }
            let missing = session.draft.missing_fields();
            if !missing.is_empty() {
                debug!(?missing, "reservation: submit refused, required fields empty");
                return session.status.clone();
            }
            let previous = std::mem::replace(&mut session.status, SubmissionState::Submitting);
            let in_flight = InFlight {
                session: &self.session,
                previous: Some(previous),
            };
            (session.draft.clone(), in_flight)
        };

        info!(guests = draft.guests, date = %draft.date, time = %draft.time, "reservation: submitting");
        let outcome = tokio::select! {
            biased;
            _ = self.lifecycle.cancelled() => None,
            result = self.api.create_reservation(&draft) => Some(result),
        };
        in_flight.settle();

        let mut session = lock(&self.session);
        let result = match outcome {
            Some(result) if !self.lifecycle.is_cancelled() => result,
            _ => {
                debug!("reservation: form torn down, discarding response");
                return session.status.clone();
            }
        };

        match result {
            Ok(()) => {
                info!("reservation: confirmed");
                session.status = SubmissionState::Succeeded;
                session.draft = ReservationDraft::default();
            }
            Err(error) => {
                warn!(%error, "reservation: submission failed");
                session.status = SubmissionState::Failed(error.user_message());
            }
        }
        session.status.clone()
    }

    /// Starts a new form session: empty draft, `Idle` status.
    ///
    /// No-op while a request is in flight, unless the form has been torn down.
    pub fn reset(&self) {
        let mut session = lock(&self.session);
        if session.status == SubmissionState::Submitting && !self.lifecycle.is_cancelled() {
            return;
        }
        session.draft = ReservationDraft::default();
        session.status = SubmissionState::Idle;
    }

    pub fn teardown(&self) {
        self.lifecycle.cancel();
    }
}

impl Drop for ReservationFormController {
    fn drop(&mut self) {
        self.lifecycle.cancel();
    }
}

#[cfg(test)]
#[path = "tests/reservation_tests.rs"]
mod tests;
