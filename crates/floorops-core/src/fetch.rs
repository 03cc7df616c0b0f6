use crate::config::DashboardConfig;
use crate::error::FetchError;
use crate::model::{ConnectionState, Snapshot};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("floorops/", env!("CARGO_PKG_VERSION"));

/// Shared client for the probe and the fetcher. Per-request timeouts are set
/// by the callers.
pub fn build_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().user_agent(USER_AGENT).build()
}

#[derive(Clone, Debug)]
pub struct SnapshotFetcher {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl SnapshotFetcher {
    pub fn new(client: reqwest::Client, config: &DashboardConfig) -> Self {
        Self {
            client,
            url: config.data_url(),
            timeout: config.fetch_timeout,
        }
    }

    /// `None` means "keep showing what you have": offline, transport errors
    /// and unusable bodies all land here after being logged.
    pub async fn fetch(&self, connection: ConnectionState) -> Option<Snapshot> {
        match self.try_fetch(connection).await {
            Ok(snapshot) => Some(snapshot),
            Err(FetchError::Offline) => {
                debug!(event = "snapshot_fetch_skipped", url = %self.url);
                None
            }
            Err(err) => {
                warn!(
                    event = "snapshot_fetch_failed",
                    url = %self.url,
                    kind = err.kind(),
                    error = %err
                );
                None
            }
        }
    }

    pub async fn try_fetch(&self, connection: ConnectionState) -> Result<Snapshot, FetchError> {
        if !connection.is_online() {
            return Err(FetchError::Offline);
        }
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status));
        }
        let body = response.bytes().await?;
        let value: Value = serde_json::from_slice(&body)?;
        let snapshot = Snapshot::from_value(value)?;
        debug!(
            event = "snapshot_fetched",
            tables = snapshot.live_status().len(),
            bytes = body.len()
        );
        Ok(snapshot)
    }
}
