//! Fire-and-forget writes.
//!
//! Every method here returns nothing the caller could branch on for
//! correctness: serialisation errors, transport failures, non-success
//! statuses and malformed bodies all stop at this layer and are only
//! visible as `debug` events. Callers must not assume a write landed.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::transport::{Prefer, Transport};

#[derive(Clone)]
pub struct RemoteWriter {
    transport: Arc<dyn Transport>,
}

impl RemoteWriter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Insert a row and discard the outcome.
    pub async fn send<P: Serialize + ?Sized>(&self, table: &str, payload: &P) {
        let body = match serde_json::to_value(payload) {
            Ok(body) => body,
            Err(e) => {
                debug!(table, error = %e, "dropping unserialisable payload");
                return;
            }
        };
        if let Err(e) = self.transport.insert(table, body, Prefer::Minimal).await {
            debug!(table, error = %e, "write failed");
        }
    }

    /// Insert a row and return the store's representation of it, if any.
    pub async fn send_returning<P: Serialize + ?Sized>(
        &self,
        table: &str,
        payload: &P,
    ) -> Option<Value> {
        let body = match serde_json::to_value(payload) {
            Ok(body) => body,
            Err(e) => {
                debug!(table, error = %e, "dropping unserialisable payload");
                return None;
            }
        };
        match self
            .transport
            .insert(table, body, Prefer::Representation)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                debug!(table, error = %e, "write failed");
                None
            }
        }
    }

    /// Queue an unload-safe write. Never waits for the store.
    pub fn send_beacon<P: Serialize + ?Sized>(&self, table: &str, payload: &P) {
        let body = match serde_json::to_value(payload) {
            Ok(body) => body,
            Err(e) => {
                debug!(table, error = %e, "dropping unserialisable payload");
                return;
            }
        };
        if let Err(e) = self.transport.beacon(table, body) {
            debug!(table, error = %e, "beacon not queued");
        }
    }
}
