//! PostgREST transport for the hosted telemetry tables.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};
use visitlog_core::TelemetryConfig;

use crate::transport::{Prefer, Transport, WriteError};

/// HTTP transport for `{base_url}/rest/v1/{table}` inserts.
///
/// Every request carries the shared key twice, as `apikey` and as a bearer
/// token. Beacons run on a task tracker so a host that is shutting down can
/// [`flush`](Self::flush) them before exiting.
pub struct RestTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    beacons: TaskTracker,
}

impl RestTransport {
    /// Create a transport for the given store.
    ///
    /// `base_url` should be like `https://project.supabase.co` (no trailing slash).
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, WriteError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            beacons: TaskTracker::new(),
        })
    }

    pub fn from_config(config: &TelemetryConfig) -> Result<Self, WriteError> {
        Self::new(
            config.base_url.clone(),
            config.api_key.clone(),
            config.request_timeout,
        )
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn build_request(
        &self,
        table: &str,
        body: &Value,
        prefer: Option<Prefer>,
    ) -> Result<reqwest::Request, WriteError> {
        let mut req = self
            .client
            .post(self.endpoint(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(body);
        if let Some(prefer) = prefer {
            req = req.header("Prefer", prefer.header_value());
        }
        Ok(req.build()?)
    }

    /// Wait up to `deadline` for queued beacons. Returns `false` on timeout.
    ///
    /// Beacons queued after a flush are still delivered and tracked.
    pub async fn flush(&self, deadline: Duration) -> bool {
        self.beacons.close();
        let pending = self.beacons.len();
        let done = tokio::time::timeout(deadline, self.beacons.wait())
            .await
            .is_ok();
        self.beacons.reopen();
        info!(pending, done, "beacon flush");
        done
    }
}

#[async_trait]
impl Transport for RestTransport {
    async fn insert(
        &self,
        table: &str,
        body: Value,
        prefer: Prefer,
    ) -> Result<Option<Value>, WriteError> {
        let req = self.build_request(table, &body, Some(prefer))?;
        debug!(url = %req.url(), prefer = prefer.header_value(), "inserting row");

        let resp = self.client.execute(req).await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(WriteError::Server {
                status: status.as_u16(),
                body,
            });
        }

        match prefer {
            Prefer::Minimal => Ok(None),
            Prefer::Representation => {
                let bytes = resp.bytes().await?;
                Ok(Some(serde_json::from_slice(&bytes)?))
            }
        }
    }

    fn beacon(&self, table: &str, body: Value) -> Result<(), WriteError> {
        let handle = Handle::try_current().map_err(|_| WriteError::BeaconUnavailable)?;
        let req = self.build_request(table, &body, None)?;
        let client = self.client.clone();
        let url = req.url().to_string();

        self.beacons.spawn_on(
            async move {
                match client.execute(req).await {
                    Ok(resp) => debug!(url = %url, status = resp.status().as_u16(), "beacon sent"),
                    Err(e) => debug!(url = %url, error = %e, "beacon failed"),
                }
            },
            &handle,
        );
        Ok(())
    }
}
