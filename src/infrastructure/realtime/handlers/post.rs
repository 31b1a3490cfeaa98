use tokio::sync::broadcast::error::RecvError;

use crate::infrastructure::realtime::hub::RealtimeHub;

/// Relays post interactions (reactions, comments) to every client.
pub struct PostHandler {
    hub: RealtimeHub,
}

impl PostHandler {
    pub fn new(hub: RealtimeHub) -> Self {
        Self { hub }
    }

    pub fn listen(self) {
        let mut inbound = self.hub.subscribe_inbound();
        tokio::spawn(async move {
            loop {
                match inbound.recv().await {
                    Ok(ev) => match ev.event.as_str() {
                        "reaction" => self.hub.emit("update reaction", ev.data).await,
                        "comment" => self.hub.emit("update comment", ev.data).await,
                        _ => {}
                    },
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "post_handler_lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::realtime::hub::ClientEvent;

    #[tokio::test]
    async fn reaction_is_rebroadcast_as_update() {
        let hub = RealtimeHub::new();
        PostHandler::new(hub.clone()).listen();
        let mut rx = hub.subscribe();
        hub.ingest(ClientEvent {
            event: "reaction".into(),
            data: serde_json::json!({"postId": "p1", "type": "love"}),
        });
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.event, "update reaction");
        assert_eq!(ev.data["postId"], "p1");
    }

    #[tokio::test]
    async fn unrelated_events_are_ignored() {
        let hub = RealtimeHub::new();
        PostHandler::new(hub.clone()).listen();
        let mut rx = hub.subscribe();
        hub.ingest(ClientEvent {
            event: "follow user".into(),
            data: serde_json::Value::Null,
        });
        hub.ingest(ClientEvent {
            event: "comment".into(),
            data: serde_json::Value::Null,
        });
        assert_eq!(rx.recv().await.unwrap().event, "update comment");
    }
}
