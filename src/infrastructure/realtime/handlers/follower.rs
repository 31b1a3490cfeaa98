use tokio::sync::broadcast::error::RecvError;

use crate::infrastructure::realtime::hub::RealtimeHub;

/// Relays follow/unfollow actions to every client.
pub struct FollowerHandler {
    hub: RealtimeHub,
}

impl FollowerHandler {
    pub fn new(hub: RealtimeHub) -> Self {
        Self { hub }
    }

    pub fn listen(self) {
        let mut inbound = self.hub.subscribe_inbound();
        tokio::spawn(async move {
            loop {
                match inbound.recv().await {
                    Ok(ev) => match ev.event.as_str() {
                        "follow user" => self.hub.emit("add follower", ev.data).await,
                        "unfollow user" => self.hub.emit("remove follower", ev.data).await,
                        _ => {}
                    },
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "follower_handler_lagged");
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
    async fn unfollow_is_rebroadcast_as_removal() {
        let hub = RealtimeHub::new();
        FollowerHandler::new(hub.clone()).listen();
        let mut rx = hub.subscribe();
        hub.ingest(ClientEvent {
            event: "unfollow user".into(),
            data: serde_json::json!({"followerId": "f9"}),
        });
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.event, "remove follower");
        assert_eq!(ev.data["followerId"], "f9");
    }
}
