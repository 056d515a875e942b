use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::{
    domain::{MenuItem, ReservationDraft},
    error::detail_message,
    protocol::ReservationSchema,
};
use tracing::debug;
use url::Url;

use crate::{config::normalize_backend_url, RemoteApi, RemoteError, Settings};

/// [`RemoteApi`] over HTTP/JSON against `{base}/api/...`.
pub struct HttpRemoteApi {
    http: Client,
    base_url: String,
    schema: ReservationSchema,
}

impl HttpRemoteApi {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            http: Client::new(),
            base_url: normalize_backend_url(base_url.as_ref()),
            schema: ReservationSchema::default(),
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let base_url = normalize_backend_url(&settings.backend_url);
        let parsed = Url::parse(&base_url)
            .with_context(|| format!("invalid backend url '{base_url}'"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("backend url '{base_url}' must use http or https");
        }

        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build http client")?;

        Ok(Self {
            http,
            base_url,
            schema: settings.reservation_schema,
        })
    }

    pub fn with_schema(mut self, schema: ReservationSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl RemoteApi for HttpRemoteApi {
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, RemoteError> {
        let response = self.http.get(self.endpoint("/api/menu")).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                detail: detail_message(&body),
            });
        }

        let payload: Value = serde_json::from_slice(&body)
            .map_err(|err| RemoteError::Shape(format!("menu body is not json: {err}")))?;
        if !payload.is_array() {
            return Err(RemoteError::Shape("array expected".into()));
        }
        let items: Vec<MenuItem> = serde_json::from_value(payload)
            .map_err(|err| RemoteError::Shape(format!("malformed menu item: {err}")))?;
        debug!(items = items.len(), "fetched menu");
        Ok(items)
    }

    async fn create_reservation(&self, draft: &ReservationDraft) -> Result<(), RemoteError> {
        let response = self
            .http
            .post(self.endpoint("/api/reservations"))
            .json(&self.schema.payload(draft))
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        // A body that cannot be read still leaves the status as the error.
        let body = response.bytes().await.unwrap_or_default();
        Err(RemoteError::Status {
            status: status.as_u16(),
            detail: detail_message(&body),
        })
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
