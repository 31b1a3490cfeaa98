use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use futures_util::StreamExt;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::application::ports::fanout::{EventEnvelope, FanoutAdapter};
use crate::infrastructure::realtime::hub::RealtimeHub;

const CHANNEL: &str = "chirp:realtime";

/// Broker-backed fan-out. Holds a dedicated publishing connection; a second,
/// subscriber-mode connection is consumed by the background reader task.
pub struct RedisFanout {
    publish: ConnectionManager,
}

impl RedisFanout {
    /// Opens both broker connections concurrently; either failing fails the
    /// whole construction, leaving the hub local-only.
    pub async fn connect(redis_url: &str, hub: RealtimeHub) -> anyhow::Result<Arc<Self>> {
        let client = redis::Client::open(redis_url).context("redis_open")?;
        let (publish, mut pubsub) = tokio::try_join!(
            client.get_connection_manager(),
            client.get_async_pubsub()
        )
        .context("redis_connect")?;
        pubsub.subscribe(CHANNEL).await.context("redis_subscribe")?;

        tokio::spawn(async move {
            let mut messages = pubsub.into_on_message();
            while let Some(msg) = messages.next().await {
                let payload: String = match msg.get_payload() {
                    Ok(p) => p,
                    Err(e) => {
                        tracing::warn!(error = ?e, "fanout_payload_unreadable");
                        continue;
                    }
                };
                match serde_json::from_str::<EventEnvelope>(&payload) {
                    Ok(envelope) => hub.inject_remote(envelope),
                    Err(e) => tracing::warn!(error = ?e, "fanout_envelope_undecodable"),
                }
            }
            tracing::warn!("fanout_subscription_closed");
        });

        Ok(Arc::new(Self { publish }))
    }
}

#[async_trait]
impl FanoutAdapter for RedisFanout {
    async fn publish(&self, envelope: &EventEnvelope) -> anyhow::Result<()> {
        let payload = serde_json::to_string(envelope).context("fanout_encode")?;
        let mut conn = self.publish.clone();
        let _: () = conn
            .publish(CHANNEL, payload)
            .await
            .context("redis_publish")?;
        Ok(())
    }
}
