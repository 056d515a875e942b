use thiserror::Error;

/// Shown when a submission fails without a usable message from the backend.
pub const RESERVATION_FAILED: &str = "Gagal mengirim reservasi";

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request to backend failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend responded with status {status}")]
    Status { status: u16, detail: Option<String> },
    #[error("unexpected backend response: {0}")]
    Shape(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl RemoteError {
    /// Human-readable reason supplied by the backend, only present on status errors.
    pub fn detail(&self) -> Option<&str> {
        match self {
            RemoteError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Copy shown to the user: the backend's `detail` when it sent one, else the generic failure.
    pub fn user_message(&self) -> String {
        self.detail()
            .map(str::to_string)
            .unwrap_or_else(|| RESERVATION_FAILED.to_string())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RemoteError::Transport(err) if err.is_timeout())
    }
}
