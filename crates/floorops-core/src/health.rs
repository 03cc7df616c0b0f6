use crate::config::DashboardConfig;
use crate::error::ProbeError;
use crate::model::ConnectionState;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Level-triggered reachability check against the data endpoint.
#[derive(Clone, Debug)]
pub struct HealthMonitor {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HealthMonitor {
    pub fn new(client: reqwest::Client, config: &DashboardConfig) -> Self {
        Self {
            client,
            url: config.data_url(),
            timeout: config.probe_timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Every failure path reads as `Offline`; nothing escapes the probe.
    pub async fn probe(&self) -> ConnectionState {
        match self.check().await {
            Ok(()) => ConnectionState::Online,
            Err(err) => {
                debug!(
                    event = "health_probe_failed",
                    url = %self.url,
                    timeout = err.is_timeout(),
                    error = %err
                );
                ConnectionState::Offline
            }
        }
    }

    pub async fn check(&self) -> Result<(), ProbeError> {
        let response = self
            .client
            .head(&self.url)
            .timeout(self.timeout)
            .send()
            .await?;
        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(ProbeError::Status(status)),
        }
    }
}
