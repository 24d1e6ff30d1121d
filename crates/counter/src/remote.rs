use std::future::Future;
use std::time::Duration;

use portfolio_core::{AnalyticsRecord, ViewCounts};
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::error::RemoteError;

/// The authoritative server-side counter as seen from a client.
pub trait RemoteCounter {
    fn get_count(
        &self,
        project_id: &str,
    ) -> impl Future<Output = Result<ViewCounts, RemoteError>> + Send;

    /// The server identifies the visitor from the request itself.
    fn record_view(
        &self,
        project_id: &str,
    ) -> impl Future<Output = Result<ViewCounts, RemoteError>> + Send;

    fn summary(&self) -> impl Future<Output = Result<Vec<AnalyticsRecord>, RemoteError>> + Send;
}

#[derive(Debug, Clone)]
pub struct RemoteSettings {
    /// Base URL including the `/api` prefix, e.g. `http://localhost:3001/api`.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001/api".to_string(),
            timeout: Duration::from_secs(3),
        }
    }
}

#[derive(Clone)]
pub struct HttpRemoteCounter {
    base: String,
    client: Client,
}

#[derive(Deserialize)]
struct SummaryBody {
    analytics: Vec<AnalyticsRecord>,
}

impl HttpRemoteCounter {
    pub fn new(settings: &RemoteSettings) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(map_transport)?;
        Ok(Self {
            base: settings.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn views_url(&self, project_id: &str) -> String {
        format!("{}/analytics/views/{}", self.base, project_id)
    }

    pub async fn health(&self) -> Result<(), RemoteError> {
        let url = format!("{}/health", self.base);
        let resp = self.client.get(&url).send().await.map_err(map_transport)?;
        ensure_success(resp).map(|_| ())
    }
}

impl RemoteCounter for HttpRemoteCounter {
    async fn get_count(&self, project_id: &str) -> Result<ViewCounts, RemoteError> {
        let resp = self
            .client
            .get(self.views_url(project_id))
            .send()
            .await
            .map_err(map_transport)?;
        ensure_success(resp)?
            .json::<ViewCounts>()
            .await
            .map_err(map_transport)
    }

    async fn record_view(&self, project_id: &str) -> Result<ViewCounts, RemoteError> {
        let resp = self
            .client
            .post(self.views_url(project_id))
            .send()
            .await
            .map_err(map_transport)?;
        ensure_success(resp)?
            .json::<ViewCounts>()
            .await
            .map_err(map_transport)
    }

    async fn summary(&self) -> Result<Vec<AnalyticsRecord>, RemoteError> {
        let url = format!("{}/analytics/summary", self.base);
        let resp = self.client.get(&url).send().await.map_err(map_transport)?;
        let body = ensure_success(resp)?
            .json::<SummaryBody>()
            .await
            .map_err(map_transport)?;
        Ok(body.analytics)
    }
}

fn ensure_success(resp: Response) -> Result<Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(RemoteError::Status(status.as_u16()))
    }
}

fn map_transport(err: reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        RemoteError::Timeout
    } else {
        RemoteError::Transport(err)
    }
}
