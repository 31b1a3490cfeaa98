use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use crate::application::ports::fanout::{EventEnvelope, FanoutAdapter};

// Lagging subscribers drop the oldest events rather than stalling the hub.
const EVENT_BUFFER: usize = 256;

/// Event pushed to every connected WebSocket client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerEvent {
    pub event: String,
    pub data: serde_json::Value,
}

/// Event received from a WebSocket client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientEvent {
    pub event: String,
    pub data: serde_json::Value,
}

/// Shared realtime hub. One per process; the domain handlers and every
/// WebSocket connection hold clones. Fan-out across processes only happens
/// once an adapter is attached.
#[derive(Clone)]
pub struct RealtimeHub {
    origin: Uuid,
    outbound: broadcast::Sender<ServerEvent>,
    inbound: broadcast::Sender<ClientEvent>,
    fanout: Arc<RwLock<Option<Arc<dyn FanoutAdapter>>>>,
}

impl Default for RealtimeHub {
    fn default() -> Self {
        Self::new()
    }
}

impl RealtimeHub {
    pub fn new() -> Self {
        let (outbound, _) = broadcast::channel(EVENT_BUFFER);
        let (inbound, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            origin: Uuid::new_v4(),
            outbound,
            inbound,
            fanout: Arc::new(RwLock::new(None)),
        }
    }

    pub fn origin(&self) -> Uuid {
        self.origin
    }

    /// Outbound stream for a WebSocket connection.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.outbound.subscribe()
    }

    /// Inbound stream for a domain handler.
    pub fn subscribe_inbound(&self) -> broadcast::Receiver<ClientEvent> {
        self.inbound.subscribe()
    }

    /// Feed one client frame into the handler chain.
    pub fn ingest(&self, event: ClientEvent) {
        let _ = self.inbound.send(event);
    }

    pub async fn attach_fanout(&self, adapter: Arc<dyn FanoutAdapter>) {
        *self.fanout.write().await = Some(adapter);
    }

    /// Emit to local clients and, when an adapter is attached, to the other
    /// server processes. Publish failures are logged; local delivery already
    /// happened by then.
    pub async fn emit(&self, event: impl Into<String>, data: serde_json::Value) {
        let event = event.into();
        let _ = self.outbound.send(ServerEvent {
            event: event.clone(),
            data: data.clone(),
        });
        let adapter = self.fanout.read().await.clone();
        if let Some(adapter) = adapter {
            let envelope = EventEnvelope {
                origin: self.origin,
                event,
                data,
            };
            if let Err(e) = adapter.publish(&envelope).await {
                tracing::warn!(error = ?e, "fanout_publish_failed");
            }
        }
    }

    /// Apply an envelope received from the broker. Envelopes published by
    /// this process already reached local clients and are dropped.
    pub fn inject_remote(&self, envelope: EventEnvelope) {
        if envelope.origin == self.origin {
            return;
        }
        let _ = self.outbound.send(ServerEvent {
            event: envelope.event,
            data: envelope.data,
        });
    }
}
