use async_trait::async_trait;
use shared::domain::{MenuItem, ReservationDraft};

pub mod config;
pub mod error;
pub mod menu;
pub mod reservation;
pub mod transport;

pub use config::{load_settings, Settings};
pub use error::RemoteError;
pub use menu::{derive_categories, filter_by_category, FetchState, MenuListController};
pub use reservation::{ReservationFormController, SubmissionState};
pub use transport::HttpRemoteApi;

/// The storefront backend as seen by the controllers.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// `GET /api/menu`: the full catalog, no paging.
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, RemoteError>;
    /// `POST /api/reservations`. `Ok` means the backend answered with a success status.
    async fn create_reservation(&self, draft: &ReservationDraft) -> Result<(), RemoteError>;
}

/// Stand-in used when no backend is wired; every call fails.
pub struct MissingRemoteApi;

#[async_trait]
impl RemoteApi for MissingRemoteApi {
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, RemoteError> {
        Err(RemoteError::Unavailable("no backend configured".into()))
    }

    async fn create_reservation(&self, _draft: &ReservationDraft) -> Result<(), RemoteError> {
        Err(RemoteError::Unavailable("no backend configured".into()))
    }
}
