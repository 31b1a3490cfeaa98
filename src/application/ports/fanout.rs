use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wire form of a realtime event as it crosses the broker. `origin` is the
/// emitting process id; receivers drop their own envelopes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub origin: Uuid,
    pub event: String,
    pub data: serde_json::Value,
}

/// Cross-process fan-out for realtime events. Without an adapter attached,
/// each process only reaches its locally connected clients.
#[async_trait]
pub trait FanoutAdapter: Send + Sync {
    async fn publish(&self, envelope: &EventEnvelope) -> anyhow::Result<()>;
}
